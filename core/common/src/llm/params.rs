//! サンプリングパラメータの検証
//!
//! CLI から渡された温度などのパラメータを API に送る前にここで検証する。
//! 範囲外はエラー（リクエスト前に失敗させる）、組み合わせの問題は警告として返す。

use crate::error::Error;

/// OpenAI が受け付ける stop シーケンスの最大数
const MAX_STOP_SEQUENCES: usize = 4;

/// completion リクエストのサンプリングパラメータ
///
/// `None` のフィールドはペイロードに含めない（API 側のデフォルトに任せる）。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamplingParams {
    /// 0.0..=2.0
    pub temperature: Option<f64>,
    /// 0.0..=1.0
    pub top_p: Option<f64>,
    /// -2.0..=2.0
    pub frequency_penalty: Option<f64>,
    /// -2.0..=2.0
    pub presence_penalty: Option<f64>,
    /// 最大4つ。超過分は validate() で切り詰める
    pub stop: Vec<String>,
}

impl SamplingParams {
    /// パラメータを検証し、必要なら正規化する
    ///
    /// 範囲外の値は `Error::InvalidArgument`。stop が4つを超える場合は
    /// 切り詰めて警告を返す。temperature と top_p の同時指定は API 推奨に
    /// 反するため警告のみ（エラーにはしない）。
    pub fn validate(&mut self) -> Result<Vec<String>, Error> {
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(Error::invalid_argument(format!(
                    "temperature must be between 0.0 and 2.0, got {t}"
                )));
            }
        }
        if let Some(p) = self.top_p {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::invalid_argument(format!(
                    "top_p must be between 0.0 and 1.0, got {p}"
                )));
            }
        }
        if let Some(f) = self.frequency_penalty {
            if !(-2.0..=2.0).contains(&f) {
                return Err(Error::invalid_argument(format!(
                    "frequency_penalty must be between -2.0 and 2.0, got {f}"
                )));
            }
        }
        if let Some(p) = self.presence_penalty {
            if !(-2.0..=2.0).contains(&p) {
                return Err(Error::invalid_argument(format!(
                    "presence_penalty must be between -2.0 and 2.0, got {p}"
                )));
            }
        }

        let mut warnings = Vec::new();
        if self.stop.len() > MAX_STOP_SEQUENCES {
            warnings.push(format!(
                "only {MAX_STOP_SEQUENCES} stop sequences are supported; ignoring {} extra",
                self.stop.len() - MAX_STOP_SEQUENCES
            ));
            self.stop.truncate(MAX_STOP_SEQUENCES);
        }
        if self.temperature.is_some() && self.top_p.is_some() {
            warnings.push(
                "setting both temperature and top_p is not recommended; \
                 the API suggests altering one or the other"
                    .to_string(),
            );
        }
        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_validate_clean() {
        let mut params = SamplingParams::default();
        let warnings = params.validate().unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_temperature_range() {
        let mut params = SamplingParams {
            temperature: Some(2.0),
            ..Default::default()
        };
        assert!(params.validate().is_ok());

        params.temperature = Some(2.1);
        let err = params.validate().unwrap_err();
        assert_eq!(err.exit_code(), 64);
        assert!(err.to_string().contains("temperature"));

        params.temperature = Some(-0.1);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_top_p_range() {
        let mut params = SamplingParams {
            top_p: Some(1.0),
            ..Default::default()
        };
        assert!(params.validate().is_ok());

        params.top_p = Some(1.5);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_penalty_ranges() {
        let mut params = SamplingParams {
            frequency_penalty: Some(-2.0),
            presence_penalty: Some(2.0),
            ..Default::default()
        };
        assert!(params.validate().is_ok());

        params.frequency_penalty = Some(-2.5);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_stop_sequences_truncated_with_warning() {
        let mut params = SamplingParams {
            stop: vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "d".to_string(),
                "e".to_string(),
            ],
            ..Default::default()
        };
        let warnings = params.validate().unwrap();
        assert_eq!(params.stop.len(), 4);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("stop sequences"));
    }

    #[test]
    fn test_temperature_and_top_p_warns() {
        let mut params = SamplingParams {
            temperature: Some(0.7),
            top_p: Some(0.9),
            ..Default::default()
        };
        let warnings = params.validate().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("not recommended"));
    }
}
