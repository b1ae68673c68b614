//! リトライ方針
//!
//! 一時的なリモートエラーに対する再試行の方針を値として表す。
//! sleep の実体は Sleeper ポート側にあり、方針はここでは時間計算のみ。

use std::time::Duration;

/// デフォルトのリトライ間隔（秒）
const DEFAULT_RETRY_DELAY_SECS: u64 = 10;

/// 固定間隔のリトライ方針
///
/// `max_attempts` が `None` の場合は成功するまで無制限に再試行する。
/// どのエラーを再試行対象とするかは `Error::is_retryable` が決める。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
    /// 総試行回数の上限（初回を含む）。None で無制限
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    pub fn new(delay: Duration, max_attempts: Option<u32>) -> Self {
        Self {
            delay,
            max_attempts,
        }
    }

    /// `attempts_made` 回試行した後にもう一度試行してよいか
    pub fn should_retry(&self, attempts_made: u32) -> bool {
        match self.max_attempts {
            Some(max) => attempts_made < max,
            None => true,
        }
    }
}
