//! tiktoken による TokenCounter 実装
//!
//! まずモデル名そのままでトークナイザを引き、見つからなければモデル
//! ファミリのプレフィックスでエンコーディングを選ぶ。どちらも当たらない
//! モデルは設定エラー。

use crate::ports::outbound::TokenCounter;
use common::error::Error;
use regex::Regex;
use tiktoken_rs::CoreBPE;

/// tiktoken-rs を使う TokenCounter 実装
#[derive(Debug, Clone, Default)]
pub struct TiktokenCounter;

impl TiktokenCounter {
    pub fn new() -> Self {
        Self
    }

    /// モデル名からエンコーディングを選ぶ
    fn encoding_for_model(model: &str) -> Result<CoreBPE, Error> {
        if let Ok(bpe) = tiktoken_rs::get_bpe_from_model(model) {
            return Ok(bpe);
        }
        // 未知のバリアント名はファミリで推定する
        let o200k =
            Regex::new(r"^(gpt-4o|gpt-4\.1|gpt-5|o\d)").map_err(|e| Error::config(e.to_string()))?;
        let cl100k =
            Regex::new(r"^(gpt-3\.5|gpt-4)").map_err(|e| Error::config(e.to_string()))?;
        if o200k.is_match(model) {
            tiktoken_rs::o200k_base().map_err(|e| Error::config(e.to_string()))
        } else if cl100k.is_match(model) {
            tiktoken_rs::cl100k_base().map_err(|e| Error::config(e.to_string()))
        } else {
            Err(Error::config(format!(
                "No tokenizer found for model '{model}'"
            )))
        }
    }
}

impl TokenCounter for TiktokenCounter {
    fn count_tokens(&self, text: &str, model: &str) -> Result<usize, Error> {
        let bpe = Self::encoding_for_model(model)?;
        Ok(bpe.encode_ordinary(text).len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_is_positive_for_text() {
        let counter = TiktokenCounter::new();
        let n = counter.count_tokens("Hello, world!", "gpt-4o").unwrap();
        assert!(n > 0);
        assert!(n <= "Hello, world!".len());
    }

    #[test]
    fn test_empty_text_counts_zero() {
        let counter = TiktokenCounter::new();
        assert_eq!(counter.count_tokens("", "gpt-4o").unwrap(), 0);
    }

    #[test]
    fn test_family_fallback_for_dated_variant() {
        let counter = TiktokenCounter::new();
        // 日付付きバリアントでもファミリ推定で数えられる
        let n = counter
            .count_tokens("Hello", "gpt-4o-2099-01-01")
            .unwrap();
        assert!(n > 0);
    }

    #[test]
    fn test_unknown_model_is_config_error() {
        let counter = TiktokenCounter::new();
        let err = counter.count_tokens("Hello", "llama-3").unwrap_err();
        assert_eq!(err.exit_code(), 78);
        assert!(err.to_string().contains("llama-3"));
    }

    #[test]
    fn test_same_text_same_count() {
        let counter = TiktokenCounter::new();
        let a = counter.count_tokens("deterministic input", "gpt-4").unwrap();
        let b = counter.count_tokens("deterministic input", "gpt-4").unwrap();
        assert_eq!(a, b);
    }
}
