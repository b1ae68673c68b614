//! ユーザー入力を受け取る Outbound ポート

use common::error::Error;

/// 端末からの入力を受け取る能力
///
/// usecase はこの trait にのみ依存し、adapter が stdin/stderr で
/// プロンプトを表示する。テストではスクリプト化したスタブを使う。
pub trait UserPrompt: Send + Sync {
    /// 1つの入力を読む。EOF なら None
    ///
    /// 行末がバックスラッシュの場合は継続行として次の行と連結する。
    fn read_input(&self, prompt: &str) -> Result<Option<String>, Error>;

    /// はい/いいえの確認。yes なら true
    fn confirm(&self, question: &str) -> Result<bool, Error>;
}
