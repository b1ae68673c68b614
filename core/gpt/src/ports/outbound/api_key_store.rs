//! OpenAI APIキーの解決と保存を行う Outbound ポート

use common::error::Error;
use std::path::PathBuf;

/// APIキーの置き場所
///
/// 解決順はフラグ → 環境変数 → 鍵ファイル。プロセス全体の
/// グローバル状態には置かず、解決した値を呼び出し側へ返す。
pub trait ApiKeyStore: Send + Sync {
    /// APIキーを解決する。どこにも無ければ init を案内するエラー
    fn resolve(&self, flag_value: Option<&str>) -> Result<String, Error>;

    /// 鍵ファイルへ保存する（所有者のみ読み書き可のモードにする）
    fn save(&self, api_key: &str) -> Result<(), Error>;

    /// 鍵ファイルを削除する
    fn remove(&self) -> Result<(), Error>;

    /// 鍵ファイルのパス
    fn path(&self) -> Result<PathBuf, Error>;

    /// 鍵ファイルが存在するか
    fn exists(&self) -> Result<bool, Error>;
}
