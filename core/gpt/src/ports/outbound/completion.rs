//! chat completion を取得する Outbound ポート
//!
//! リトライと警告表示は adapter 側の責務。usecase から見るとこの trait の
//! 呼び出しは成功するか致命的エラーで返るかのどちらか。

use common::error::Error;
use common::llm::{Completion, CompletionRequest};

/// リモートの completion エンドポイントを呼ぶ能力
pub trait ChatCompletion: Send + Sync {
    /// 応答をまとめて取得する
    fn complete(&self, request: &CompletionRequest) -> Result<Completion, Error>;

    /// 応答をテキストデルタ単位で受け取りながら取得する
    fn complete_streaming(
        &self,
        request: &CompletionRequest,
        on_delta: &mut dyn FnMut(&str) -> Result<(), Error>,
    ) -> Result<Completion, Error>;
}
