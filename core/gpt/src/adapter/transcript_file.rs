//! transcript ファイルの読み書き実装
//!
//! コーデック本体は domain::transcript。ここはファイル I/O と
//! パス情報をエラーメッセージへ足すだけ。

use crate::domain::{transcript, Context};
use crate::ports::outbound::TranscriptStore;
use common::error::Error;
use common::ports::outbound::FileSystem;
use std::path::Path;
use std::sync::Arc;

/// FileSystem ポート経由で transcript を読み書きする実装
pub struct FileTranscriptStore {
    fs: Arc<dyn FileSystem>,
}

impl FileTranscriptStore {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl TranscriptStore for FileTranscriptStore {
    fn save(&self, context: &Context, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.fs.create_dir_all(parent)?;
            }
        }
        let text = transcript::serialize(context);
        self.fs.write(path, &text)
    }

    fn load_into(&self, context: &mut Context, path: &Path) -> Result<(), Error> {
        let source = self.fs.read_to_string(path)?;
        transcript::load_into(context, &source).map_err(|e| {
            Error::data_format(format!("{} in file '{}'", e, path.display()))
        })
    }
}
