//! Inbound ポート: ドライバ（CLI）がアプリを呼び出すインターフェース

use crate::domain::GptCommand;
use common::error::Error;

/// gpt-cli のコマンドを実行する Inbound ポート
///
/// main/cli はこの trait を実装した型の run を呼び出す。
pub trait CommandRunner {
    fn run(&self, command: GptCommand) -> Result<i32, Error>;
}
