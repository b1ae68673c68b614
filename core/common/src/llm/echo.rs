//! Echo プロバイダの実装
//!
//! 実際に API を呼び出さず、リクエスト内容をそのまま映すだけのプロバイダ。
//! ネットワークなしでの動作確認とテストに使う。

use crate::error::Error;
use crate::llm::provider::{Completion, CompletionRequest, LlmProvider};
use serde_json::{json, Value};

/// Echo プロバイダ
#[derive(Debug, Clone, Default)]
pub struct EchoProvider;

impl EchoProvider {
    pub fn new() -> Self {
        Self
    }
}

impl LlmProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    fn make_request_payload(&self, request: &CompletionRequest) -> Result<Value, Error> {
        Ok(json!({
            "model": request.model,
            "messages": request.messages,
            "max_tokens": request.max_completion_tokens,
        }))
    }

    fn execute(&self, request_json: &str) -> Result<String, Error> {
        // 最後の user メッセージをそのまま応答の本文にする
        let v: Value = serde_json::from_str(request_json)
            .map_err(|e| Error::api(format!("Failed to parse request JSON: {e}")))?;
        let last_user = v["messages"]
            .as_array()
            .and_then(|list| {
                list.iter()
                    .rev()
                    .find(|m| m["role"] == "user")
                    .and_then(|m| m["content"].as_str())
            })
            .unwrap_or("");
        let response = json!({
            "choices": [{"message": {"role": "assistant", "content": format!("[echo] {last_user}")}}],
            "usage": {"completion_tokens": 0}
        });
        serde_json::to_string(&response)
            .map_err(|e| Error::api(format!("Failed to serialize response: {e}")))
    }

    fn parse_completion(&self, response_json: &str) -> Result<Completion, Error> {
        let v: Value = serde_json::from_str(response_json)
            .map_err(|e| Error::api(format!("Failed to parse response JSON: {e}")))?;
        let content = v["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| Error::api("No text in response".to_string()))?;
        let completion_tokens = v["usage"]["completion_tokens"]
            .as_u64()
            .map(|n| n as usize);
        Ok(Completion {
            content,
            completion_tokens,
        })
    }

    fn execute_streaming(
        &self,
        request_json: &str,
        on_delta: &mut dyn FnMut(&str) -> Result<(), Error>,
    ) -> Result<Completion, Error> {
        let response_json = self.execute(request_json)?;
        let completion = self.parse_completion(&response_json)?;
        // 単語ごとに区切って擬似的にストリーミングする
        let mut streamed = String::new();
        for word in completion.content.split_inclusive(' ') {
            on_delta(word)?;
            streamed.push_str(word);
        }
        Ok(Completion {
            content: streamed,
            completion_tokens: None,
        })
    }
}
