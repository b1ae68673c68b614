//! スリープの Outbound ポート
//!
//! リトライ時の待機を trait に切り出し、テストでは実時間を消費しない
//! フェイク実装に差し替えられるようにする。

use std::time::Duration;

/// 指定時間だけ待機する能力
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}
