//! OpenAI モデルの上限値テーブル
//!
//! モデル名からコンテキスト窓と出力トークン上限を引く。日付付きの
//! バリアント名（gpt-4o-2024-08-06 など）も拾えるよう前方一致で引き、
//! 複数パターンに一致する場合は最長のものを採用する。

use common::error::Error;

/// (パターン, コンテキスト窓, 出力上限)
const MODEL_LIMITS: &[(&str, usize, usize)] = &[
    ("gpt-3.5-turbo", 16_385, 4_096),
    ("gpt-4", 8_192, 8_192),
    ("gpt-4-turbo", 128_000, 4_096),
    ("gpt-4o", 128_000, 4_096),
    ("gpt-4o-mini", 128_000, 16_384),
    ("gpt-4.1", 1_047_576, 32_768),
    ("gpt-4.1-mini", 1_047_576, 32_768),
    ("o1", 200_000, 100_000),
    ("o3", 200_000, 100_000),
    ("o4-mini", 200_000, 100_000),
];

/// 解決済みのモデル記述子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiModel {
    name: String,
    max_context_tokens: usize,
    max_output_tokens: usize,
}

impl OpenAiModel {
    /// モデル名を上限値テーブルで解決する。未知のモデルは設定エラー
    pub fn resolve(name: &str) -> Result<Self, Error> {
        let matched = MODEL_LIMITS
            .iter()
            .filter(|(pattern, _, _)| name.starts_with(pattern))
            .max_by_key(|(pattern, _, _)| pattern.len());
        match matched {
            Some(&(_, max_context_tokens, max_output_tokens)) => Ok(Self {
                name: name.to_string(),
                max_context_tokens,
                max_output_tokens,
            }),
            None => Err(Error::config(format!(
                "Model '{name}' is not supported. Check the list of supported models \
                 at https://platform.openai.com/docs/models."
            ))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// コンテキスト窓（入力＋出力の合計上限）
    pub fn max_context_tokens(&self) -> usize {
        self.max_context_tokens
    }

    /// 1回の応答の出力トークン上限
    pub fn max_output_tokens(&self) -> usize {
        self.max_output_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_models() {
        let model = OpenAiModel::resolve("gpt-4o-mini").unwrap();
        assert_eq!(model.name(), "gpt-4o-mini");
        assert_eq!(model.max_context_tokens(), 128_000);
        assert_eq!(model.max_output_tokens(), 16_384);

        let model = OpenAiModel::resolve("gpt-3.5-turbo").unwrap();
        assert_eq!(model.max_context_tokens(), 16_385);
    }

    #[test]
    fn test_resolve_prefers_longest_pattern() {
        // "gpt-4o-mini" は "gpt-4o" より長いパターンに一致させる
        let model = OpenAiModel::resolve("gpt-4o-mini-2024-07-18").unwrap();
        assert_eq!(model.max_output_tokens(), 16_384);

        // 日付付きの gpt-4o は gpt-4o の値
        let model = OpenAiModel::resolve("gpt-4o-2024-08-06").unwrap();
        assert_eq!(model.max_output_tokens(), 4_096);
    }

    #[test]
    fn test_resolve_unknown_model_is_config_error() {
        let err = OpenAiModel::resolve("claude-3").unwrap_err();
        assert_eq!(err.exit_code(), 78);
        assert!(err.to_string().contains("claude-3"));
    }
}
