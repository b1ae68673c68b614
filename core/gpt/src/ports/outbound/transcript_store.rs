//! transcript の読み書きを行う Outbound ポート
//!
//! パスはドライバ（CLI フラグ）が決める。Context はパスを選ばない。

use crate::domain::Context;
use common::error::Error;
use std::path::Path;

/// transcript ファイルの読み書きの能力
pub trait TranscriptStore: Send + Sync {
    /// Context を保存形式で書き出す
    fn save(&self, context: &Context, path: &Path) -> Result<(), Error>;

    /// ファイルを解析して Context に反映する（all-or-nothing）
    fn load_into(&self, context: &mut Context, path: &Path) -> Result<(), Error>;
}
