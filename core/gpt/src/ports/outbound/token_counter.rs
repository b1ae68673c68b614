//! テキストのトークン数を数える Outbound ポート

use common::error::Error;

/// モデルのトークナイザでテキストのトークン数を数える能力
///
/// 純関数。状態を持たない。モデル名が未知でフォールバックも
/// 選べない場合は設定エラーを返す。
pub trait TokenCounter: Send + Sync {
    fn count_tokens(&self, text: &str, model: &str) -> Result<usize, Error>;
}
