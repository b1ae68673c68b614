//! 会話コンテキスト
//!
//! 会話全体の transcript（追記専用）と system スロットを持ち、
//! モデルのトークン予算に収まる直近の連続部分列を選び出す。
//! 保持する transcript 自体は無制限に伸びる。予算で制限されるのは
//! API に送る選択結果だけ。

use crate::domain::message::Message;
use crate::domain::model::OpenAiModel;
use crate::domain::role::Role;
use crate::ports::outbound::TokenCounter;
use common::error::Error;
use common::llm::ChatMessage;
use std::sync::Arc;

/// 会話コンテキスト
///
/// モデルは構築時に固定する。トークン数と予算はそのモデルに対して
/// のみ意味を持つため、途中で差し替えない。
pub struct Context {
    model: OpenAiModel,
    system: Message,
    messages: Vec<Message>,
    counter: Arc<dyn TokenCounter>,
}

impl Context {
    pub fn new(model: OpenAiModel, counter: Arc<dyn TokenCounter>) -> Self {
        Self {
            model,
            system: Message::unset_system(),
            messages: Vec::new(),
            counter,
        }
    }

    pub fn model(&self) -> &OpenAiModel {
        &self.model
    }

    /// system メッセージを差し替える（マージはしない・最後の値が勝つ）
    pub fn set_system(&mut self, content: &str) -> Result<(), Error> {
        self.system = Message::new(
            Role::System,
            Some(content.to_string()),
            None,
            self.counter.as_ref(),
            self.model.name(),
        )?;
        Ok(())
    }

    pub fn is_system_set(&self) -> bool {
        self.system.is_content_set()
    }

    pub fn system(&self) -> &Message {
        &self.system
    }

    /// system 以外の transcript（会話順）
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// 構築済み Message を追加する
    ///
    /// system role のメッセージはスロットの差し替えになり、transcript
    /// には入らない。これでどの追加経路でも不変条件が保たれる。
    pub fn add(&mut self, message: Message) {
        match message.role() {
            Role::System => self.system = message,
            Role::User | Role::Assistant => self.messages.push(message),
        }
    }

    /// content と role から Message を構築して追加する
    pub fn add_message(&mut self, content: &str, role: Role) -> Result<(), Error> {
        let message = Message::new(
            role,
            Some(content.to_string()),
            None,
            self.counter.as_ref(),
            self.model.name(),
        )?;
        self.add(message);
        Ok(())
    }

    /// トークン数を信用して Message を追加する（API の usage 会計用）
    pub fn add_message_with_token_count(
        &mut self,
        content: &str,
        role: Role,
        token_count: usize,
    ) -> Result<(), Error> {
        let message = Message::new(
            role,
            Some(content.to_string()),
            Some(token_count),
            self.counter.as_ref(),
            self.model.name(),
        )?;
        self.add(message);
        Ok(())
    }

    /// 予算に収まるメッセージ列を選ぶ
    ///
    /// system のトークン数を最初に予約した上で、transcript を新しい方から
    /// 遡り、予算と件数上限の両方を満たす間だけ採用する。どちらかを
    /// 満たさないメッセージに当たった時点で走査を打ち切るため、結果は
    /// 必ず transcript の連続した末尾になる（歯抜けの部分集合にはならない）。
    /// 古い文脈は黙って落とす。要約も切り詰めもしない。
    ///
    /// 戻り値は時系列順。system が設定されていれば先頭に付く（件数上限
    /// には数えない）。
    pub fn get_fitted_messages(
        &self,
        max_total_tokens: usize,
        max_message_count: Option<usize>,
    ) -> Vec<&Message> {
        let max_messages = max_message_count.unwrap_or(usize::MAX);
        let mut budget_used = self.system.token_count();
        let mut selected: Vec<&Message> = Vec::new();

        for message in self.messages.iter().rev() {
            let fits_budget = budget_used + message.token_count() <= max_total_tokens;
            let fits_count = selected.len() < max_messages;
            if !(fits_budget && fits_count) {
                break;
            }
            budget_used += message.token_count();
            selected.push(message);
        }

        selected.reverse();
        if self.is_system_set() {
            selected.insert(0, &self.system);
        }
        selected
    }

    /// ワイヤ形式への射影（role と content のみ・順序維持）
    pub fn to_provider_format(fitted: &[&Message]) -> Vec<ChatMessage> {
        fitted
            .iter()
            .map(|m| ChatMessage::new(m.role().as_str(), m.content().unwrap_or_default()))
            .collect()
    }
}
