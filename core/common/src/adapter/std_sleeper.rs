//! std::thread::sleep による Sleeper 実装

use crate::ports::outbound::Sleeper;
use std::time::Duration;

/// 実時間で待機する Sleeper 実装
#[derive(Debug, Clone, Default)]
pub struct StdSleeper;

impl Sleeper for StdSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
