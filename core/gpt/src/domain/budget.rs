//! トークン予算の解決
//!
//! --max-context-tokens / --max-completion-tokens とモデル上限から、
//! 実際に使うコンテキスト予算と出力上限を決める。

use crate::domain::model::OpenAiModel;
use common::error::Error;

/// 解決済みのトークン予算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatBudget {
    /// コンテキスト（入力側）に使ってよいトークン数
    pub max_context_tokens: usize,
    /// 応答の出力トークン上限
    pub max_completion_tokens: usize,
}

impl ChatBudget {
    /// フラグ値とモデル上限から予算を解決する
    ///
    /// - completion 未指定: モデルの出力上限と窓の半分の小さい方
    /// - context 未指定: 窓から completion を引いた残り
    /// - 合計が窓を超える指定は引数エラー
    pub fn resolve(
        model: &OpenAiModel,
        max_context_tokens: Option<usize>,
        max_completion_tokens: Option<usize>,
    ) -> Result<Self, Error> {
        let window = model.max_context_tokens();

        if max_context_tokens == Some(0) {
            return Err(Error::invalid_argument(
                "--max-context-tokens must be a positive integer",
            ));
        }
        if max_completion_tokens == Some(0) {
            return Err(Error::invalid_argument(
                "--max-completion-tokens must be a positive integer",
            ));
        }

        let completion = match max_completion_tokens {
            Some(n) => n,
            None => model.max_output_tokens().min(window / 2),
        };
        if completion >= window {
            return Err(Error::invalid_argument(format!(
                "--max-completion-tokens cannot be larger than the maximum number of \
                 tokens allowed by the '{}' model: {}",
                model.name(),
                window
            )));
        }

        let context = match max_context_tokens {
            Some(n) => n,
            None => window - completion,
        };

        if completion + context > window {
            return Err(Error::invalid_argument(format!(
                "Sum of --max-completion-tokens and --max-context-tokens cannot be \
                 larger than the maximum number of tokens allowed by the '{}' model: {}",
                model.name(),
                window
            )));
        }

        Ok(Self {
            max_context_tokens: context,
            max_completion_tokens: completion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_split_the_window() {
        let model = OpenAiModel::resolve("gpt-4").unwrap(); // 窓 8192, 出力 8192
        let budget = ChatBudget::resolve(&model, None, None).unwrap();
        assert_eq!(budget.max_completion_tokens, 4_096); // min(8192, 8192/2)
        assert_eq!(budget.max_context_tokens, 4_096);
    }

    #[test]
    fn test_default_completion_capped_by_model_output_limit() {
        let model = OpenAiModel::resolve("gpt-4o").unwrap(); // 窓 128000, 出力 4096
        let budget = ChatBudget::resolve(&model, None, None).unwrap();
        assert_eq!(budget.max_completion_tokens, 4_096);
        assert_eq!(budget.max_context_tokens, 128_000 - 4_096);
    }

    #[test]
    fn test_explicit_values_are_kept() {
        let model = OpenAiModel::resolve("gpt-4o").unwrap();
        let budget = ChatBudget::resolve(&model, Some(2_048), Some(1_024)).unwrap();
        assert_eq!(budget.max_context_tokens, 2_048);
        assert_eq!(budget.max_completion_tokens, 1_024);
    }

    #[test]
    fn test_zero_values_are_usage_errors() {
        let model = OpenAiModel::resolve("gpt-4o").unwrap();
        assert_eq!(
            ChatBudget::resolve(&model, Some(0), None).unwrap_err().exit_code(),
            64
        );
        assert_eq!(
            ChatBudget::resolve(&model, None, Some(0)).unwrap_err().exit_code(),
            64
        );
    }

    #[test]
    fn test_sum_exceeding_window_is_rejected() {
        let model = OpenAiModel::resolve("gpt-4").unwrap(); // 窓 8192
        let err = ChatBudget::resolve(&model, Some(8_000), Some(1_000)).unwrap_err();
        assert_eq!(err.exit_code(), 64);
        assert!(err.to_string().contains("gpt-4"));
    }

    #[test]
    fn test_completion_exceeding_window_is_rejected() {
        let model = OpenAiModel::resolve("gpt-4").unwrap();
        let err = ChatBudget::resolve(&model, None, Some(10_000)).unwrap_err();
        assert_eq!(err.exit_code(), 64);
    }
}
