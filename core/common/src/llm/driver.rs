//! LLMドライバーの実装
//!
//! プロバイダに依存しない共通処理。ペイロード生成から応答の抽出までを
//! 一続きに実行し、一時的なエラーはリトライ方針に従って再試行する。
//! 再試行の前には `on_retry` コールバックで呼び出し側へ通知する
//! （警告表示はそちらの責務）。

use crate::error::Error;
use crate::llm::provider::{Completion, CompletionRequest, LlmProvider};
use crate::llm::retry::RetryPolicy;
use crate::ports::outbound::Sleeper;
use std::sync::Arc;
use std::time::Duration;

/// 再試行の直前に呼ばれるコールバック
///
/// 引数は発生したエラーと、これから待機する時間。
pub type OnRetry<'a> = &'a mut dyn FnMut(&Error, Duration);

/// LLMドライバー
pub struct LlmDriver<P: LlmProvider> {
    provider: P,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl<P: LlmProvider> LlmDriver<P> {
    pub fn new(provider: P, retry: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            provider,
            retry,
            sleeper,
        }
    }

    /// プロバイダを取得
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// completion を取得する
    ///
    /// 一時的なエラー（レート制限・利用不可・接続失敗）は方針に従って
    /// 再試行する。認証エラーなどの致命的エラーは即座に返す。
    pub fn complete(
        &self,
        request: &CompletionRequest,
        on_retry: OnRetry,
    ) -> Result<Completion, Error> {
        let request_json = self.serialize_request(request)?;
        self.with_retry(on_retry, || {
            let response_json = self.provider.execute(&request_json)?;
            self.provider.parse_completion(&response_json)
        })
    }

    /// ストリーミングで completion を取得する
    ///
    /// デルタが1つでも届いた後のエラーは再試行しない（同じ本文が二重に
    /// 表示されてしまうため）。届く前のエラーのみ再試行対象。
    pub fn complete_streaming(
        &self,
        request: &CompletionRequest,
        on_delta: &mut dyn FnMut(&str) -> Result<(), Error>,
        on_retry: OnRetry,
    ) -> Result<Completion, Error> {
        let request_json = self.serialize_request(request)?;
        let mut delivered = false;
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            let result = self.provider.execute_streaming(&request_json, &mut |chunk| {
                delivered = true;
                on_delta(chunk)
            });
            match result {
                Ok(completion) => return Ok(completion),
                Err(e)
                    if !delivered && e.is_retryable() && self.retry.should_retry(attempts) =>
                {
                    on_retry(&e, self.retry.delay);
                    self.sleeper.sleep(self.retry.delay);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn serialize_request(&self, request: &CompletionRequest) -> Result<String, Error> {
        let payload = self.provider.make_request_payload(request)?;
        serde_json::to_string(&payload)
            .map_err(|e| Error::api(format!("Failed to serialize request: {e}")))
    }

    fn with_retry<T>(
        &self,
        on_retry: OnRetry,
        mut op: impl FnMut() -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && self.retry.should_retry(attempts) => {
                    on_retry(&e, self.retry.delay);
                    self.sleeper.sleep(self.retry.delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}
