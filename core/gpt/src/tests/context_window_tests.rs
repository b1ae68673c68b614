//! 会話ウィンドウ選択の結合テスト
//!
//! トークン数を固定したカウンタで、予算と件数上限による
//! メッセージ選択の境界を通しで確認する。

use std::collections::BTreeMap;
use std::sync::Arc;

use common::error::Error;

use crate::domain::{Context, Message, OpenAiModel, Role};
use crate::ports::outbound::TokenCounter;

/// テスト用: 既知のテキストにだけ固定のトークン数を返すカウンタ
struct FixedTokenCounter(BTreeMap<String, usize>);

impl FixedTokenCounter {
    fn new(entries: &[(&str, usize)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(text, count)| (text.to_string(), *count))
                .collect(),
        )
    }
}

impl TokenCounter for FixedTokenCounter {
    fn count_tokens(&self, text: &str, _model: &str) -> Result<usize, Error> {
        self.0
            .get(text)
            .copied()
            .ok_or_else(|| Error::invalid_argument(format!("no fixed count for '{text}'")))
    }
}

const SYSTEM: &str = "You are a helpful assistant.";

/// system(6) + 4往復: 5, 4, 4, 5 トークンの会話
fn sample_context() -> Context {
    let counter = Arc::new(FixedTokenCounter::new(&[
        (SYSTEM, 6),
        ("Who is Banksy?", 5),
        ("I don't know.", 4),
        ("Are you sure?", 4),
        ("Yes, I am sure.", 5),
    ]));
    let model = OpenAiModel::resolve("gpt-4o-mini").unwrap();
    let mut context = Context::new(model, counter);
    context.set_system(SYSTEM).unwrap();
    context.add_message("Who is Banksy?", Role::User).unwrap();
    context.add_message("I don't know.", Role::Assistant).unwrap();
    context.add_message("Are you sure?", Role::User).unwrap();
    context
        .add_message("Yes, I am sure.", Role::Assistant)
        .unwrap();
    context
}

fn contents(fitted: &[&Message]) -> Vec<String> {
    fitted
        .iter()
        .map(|m| m.content().unwrap_or("").to_string())
        .collect()
}

#[test]
fn test_one_exchange_with_ample_budget() {
    let counter = Arc::new(FixedTokenCounter::new(&[
        (SYSTEM, 6),
        ("Who is Banksy?", 5),
        ("I don't know.", 4),
    ]));
    let model = OpenAiModel::resolve("gpt-4o-mini").unwrap();
    let mut context = Context::new(model, counter);
    context.set_system(SYSTEM).unwrap();
    context.add_message("Who is Banksy?", Role::User).unwrap();
    context.add_message("I don't know.", Role::Assistant).unwrap();

    let fitted = context.get_fitted_messages(100_000, None);
    assert_eq!(
        contents(&fitted),
        vec![SYSTEM, "Who is Banksy?", "I don't know."]
    );
}

#[test]
fn test_full_budget_keeps_whole_conversation() {
    let context = sample_context();
    // 6 + 5 + 4 + 4 + 5 = 24: ちょうど全部入る
    let fitted = context.get_fitted_messages(24, None);
    assert_eq!(
        contents(&fitted),
        vec![
            SYSTEM,
            "Who is Banksy?",
            "I don't know.",
            "Are you sure?",
            "Yes, I am sure.",
        ]
    );
}

#[test]
fn test_budget_one_short_drops_oldest() {
    let context = sample_context();
    let fitted = context.get_fitted_messages(23, None);
    assert_eq!(
        contents(&fitted),
        vec![SYSTEM, "I don't know.", "Are you sure?", "Yes, I am sure."]
    );
}

#[test]
fn test_message_count_cap_keeps_newest_pair() {
    let context = sample_context();
    let fitted = context.get_fitted_messages(1000, Some(2));
    assert_eq!(
        contents(&fitted),
        vec![SYSTEM, "Are you sure?", "Yes, I am sure."]
    );
}

#[test]
fn test_tight_budget_keeps_newest_that_fit() {
    let context = sample_context();
    // system 6 を引いた残り 9 = 5 + 4: 新しい2件だけ
    let fitted = context.get_fitted_messages(15, None);
    assert_eq!(
        contents(&fitted),
        vec![SYSTEM, "Are you sure?", "Yes, I am sure."]
    );
}

#[test]
fn test_budget_below_newest_returns_system_only() {
    let context = sample_context();
    let fitted = context.get_fitted_messages(10, None);
    assert_eq!(contents(&fitted), vec![SYSTEM]);
}

#[test]
fn test_selection_is_contiguous_suffix() {
    // 中間の巨大メッセージで打ち切られたら、それより古い小さな
    // メッセージも選ばれない
    let counter = Arc::new(FixedTokenCounter::new(&[
        (SYSTEM, 6),
        ("tiny", 1),
        ("huge", 100),
        ("newest", 2),
    ]));
    let model = OpenAiModel::resolve("gpt-4o-mini").unwrap();
    let mut context = Context::new(model, counter);
    context.set_system(SYSTEM).unwrap();
    context.add_message("tiny", Role::User).unwrap();
    context.add_message("huge", Role::Assistant).unwrap();
    context.add_message("newest", Role::User).unwrap();

    let fitted = context.get_fitted_messages(10, None);
    assert_eq!(contents(&fitted), vec![SYSTEM, "newest"]);
}

#[test]
fn test_unset_system_is_not_prepended() {
    let counter = Arc::new(FixedTokenCounter::new(&[("hello", 1)]));
    let model = OpenAiModel::resolve("gpt-4o-mini").unwrap();
    let mut context = Context::new(model, counter);
    context.add_message("hello", Role::User).unwrap();

    let fitted = context.get_fitted_messages(10, None);
    assert_eq!(contents(&fitted), vec!["hello"]);
}
