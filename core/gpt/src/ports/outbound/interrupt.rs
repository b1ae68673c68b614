//! Ctrl+C（SIGINT）による中断を検知する Outbound ポート
//!
//! 中断は次に入力を求めるタイミングで効く。ネットワーク呼び出し中には
//! 割り込まない（Context の状態を壊さないため）。

/// 中断が要求されたかどうかを返す能力
pub trait InterruptChecker: Send + Sync {
    fn is_interrupted(&self) -> bool;
}
