//! LlmDriver を ChatCompletion ポートに繋ぐ実装
//!
//! 一時的エラーのリトライはドライバ側で行われる。ここでは再試行の
//! たびに stderr への警告表示とファイルログへの記録を行う。

use crate::ports::outbound::ChatCompletion;
use common::error::Error;
use common::llm::{Completion, CompletionRequest, LlmDriver, OpenAiProvider};
use common::ports::outbound::{now_iso8601, Log, LogLevel, LogRecord};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// OpenAI プロバイダ + リトライで completion を取得する実装
pub struct StdChatCompletion {
    driver: LlmDriver<OpenAiProvider>,
    log: Arc<dyn Log>,
}

impl StdChatCompletion {
    pub fn new(driver: LlmDriver<OpenAiProvider>, log: Arc<dyn Log>) -> Self {
        Self { driver, log }
    }

    fn warn_retry(&self, error: &Error, delay: Duration) {
        eprintln!(
            "gpt-cli: warning: {}: retrying in {} seconds.",
            error.kind_name(),
            delay.as_secs()
        );
        let _ = self.log.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Warn,
            message: error.to_string(),
            layer: Some("adapter".to_string()),
            kind: Some("retry".to_string()),
            fields: {
                let mut m = BTreeMap::new();
                m.insert(
                    "delay_secs".to_string(),
                    serde_json::json!(delay.as_secs()),
                );
                Some(m)
            },
        });
    }
}

impl ChatCompletion for StdChatCompletion {
    fn complete(&self, request: &CompletionRequest) -> Result<Completion, Error> {
        self.driver
            .complete(request, &mut |e, delay| self.warn_retry(e, delay))
    }

    fn complete_streaming(
        &self,
        request: &CompletionRequest,
        on_delta: &mut dyn FnMut(&str) -> Result<(), Error>,
    ) -> Result<Completion, Error> {
        self.driver
            .complete_streaming(request, on_delta, &mut |e, delay| {
                self.warn_retry(e, delay)
            })
    }
}
