//! 環境変数解決の Outbound ポート

use crate::domain::ConfigDir;
use crate::error::Error;

/// 環境変数からの設定解決
///
/// 実装は `common::adapter::StdEnvResolver`。テストでは固定値を返すスタブを使う。
pub trait EnvResolver: Send + Sync {
    /// 設定ディレクトリを解決する
    ///
    /// 優先順: `$GPT_CLI_HOME` → `$XDG_CONFIG_HOME/gpt-cli` → `$HOME/.config/gpt-cli`
    fn resolve_config_dir(&self) -> Result<ConfigDir, Error>;

    /// `OPENAI_API_KEY` 環境変数の値（未設定・空なら None）
    fn api_key_from_env(&self) -> Option<String>;
}
