//! OpenAI プロバイダの実装
//!
//! chat-completions エンドポイントへの同期（blocking）呼び出し。
//! HTTP ステータスをエラー区分（認証・レート制限・利用不可・接続）へ
//! 分類するのはこの層の責務。リトライの判断はしない。

use crate::error::Error;
use crate::llm::provider::{Completion, CompletionRequest, LlmProvider};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI プロバイダ
pub struct OpenAiProvider {
    api_key: String,
    url: String,
}

impl OpenAiProvider {
    /// APIキーを指定してプロバイダを作成
    ///
    /// キーは呼び出し側（key store）から明示的に渡す。環境やグローバル
    /// 状態からは読まない。
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            url: DEFAULT_API_URL.to_string(),
        }
    }

    /// エンドポイントURLを差し替える（テスト用）
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// HTTP ステータスとレスポンス本文からエラーを分類する
    fn classify_http_error(status: reqwest::StatusCode, body: &str) -> Error {
        let detail = match serde_json::from_str::<Value>(body) {
            Ok(v) => v["error"]["message"]
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("HTTP {status}: {body}")),
            Err(_) => format!("HTTP {status}: {body}"),
        };
        match status.as_u16() {
            401 | 403 => Error::auth(format!("OpenAI API authentication failed: {detail}")),
            429 => Error::rate_limited(format!("OpenAI API rate limit: {detail}")),
            s if s >= 500 => Error::unavailable(format!("OpenAI API unavailable: {detail}")),
            _ => Error::api(format!("OpenAI API error: {detail}")),
        }
    }

    fn send(&self, body: String) -> Result<reqwest::blocking::Response, Error> {
        let client = reqwest::blocking::Client::new();
        client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .body(body)
            .send()
            .map_err(|e| Error::connection(format!("HTTP request failed: {e}")))
    }
}

impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn make_request_payload(&self, request: &CompletionRequest) -> Result<Value, Error> {
        let mut payload = json!({
            "model": request.model,
            "messages": request.messages,
            "max_tokens": request.max_completion_tokens,
        });

        let params = &request.params;
        if let Some(t) = params.temperature {
            payload["temperature"] = json!(t);
        }
        if let Some(p) = params.top_p {
            payload["top_p"] = json!(p);
        }
        if let Some(f) = params.frequency_penalty {
            payload["frequency_penalty"] = json!(f);
        }
        if let Some(p) = params.presence_penalty {
            payload["presence_penalty"] = json!(p);
        }
        if !params.stop.is_empty() {
            payload["stop"] = json!(params.stop);
        }

        Ok(payload)
    }

    fn execute(&self, request_json: &str) -> Result<String, Error> {
        let response = self.send(request_json.to_string())?;

        let status = response.status();
        let response_text = response
            .text()
            .map_err(|e| Error::connection(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::classify_http_error(status, &response_text));
        }

        Ok(response_text)
    }

    fn parse_completion(&self, response_json: &str) -> Result<Completion, Error> {
        let v: Value = serde_json::from_str(response_json)
            .map_err(|e| Error::api(format!("Failed to parse response JSON: {e}")))?;

        if let Some(error) = v.get("error") {
            let msg = error["message"].as_str().unwrap_or("Unknown error");
            return Err(Error::api(format!("OpenAI API error: {msg}")));
        }

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
        // "stream": true を加えたペイロードで送り直す
        let mut payload: Value = serde_json::from_str(request_json)
            .map_err(|e| Error::api(format!("Failed to parse request JSON: {e}")))?;
        payload["stream"] = json!(true);
        let streaming_json = serde_json::to_string(&payload)
            .map_err(|e| Error::api(format!("Failed to serialize request: {e}")))?;

        let response = self.send(streaming_json)?;

        let status = response.status();
        if !status.is_success() {
            let response_text = response
                .text()
                .map_err(|e| Error::connection(format!("Failed to read response: {e}")))?;
            return Err(Self::classify_http_error(status, &response_text));
        }

        let mut content = String::new();
        let reader = BufReader::new(response);
        for line_result in reader.lines() {
            let line = line_result
                .map_err(|e| Error::connection(format!("Failed to read stream line: {e}")))?;
            if let Some(data) = line.strip_prefix("data: ") {
                if data == "[DONE]" {
                    break;
                }

                let v: Value = serde_json::from_str(data)
                    .map_err(|e| Error::api(format!("Failed to parse stream JSON: {e}")))?;

                if let Some(text) = v["choices"][0]["delta"]["content"].as_str() {
                    content.push_str(text);
                    on_delta(text)?;
                }
            }
        }

        // ストリーミングでは usage が返らないので応答トークン数は不明
        Ok(Completion {
            content,
            completion_tokens: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::params::SamplingParams;
    use crate::llm::provider::ChatMessage;

    fn request(params: SamplingParams) -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o".to_string(),
            messages: vec![
                ChatMessage::system("You are a helpful assistant."),
                ChatMessage::user("Hello"),
            ],
            max_completion_tokens: 1024,
            params,
        }
    }

    #[test]
    fn test_make_request_payload_minimal() {
        let provider = OpenAiProvider::new("test-key");
        let payload = provider
            .make_request_payload(&request(SamplingParams::default()))
            .unwrap();
        assert_eq!(payload["model"], "gpt-4o");
        assert_eq!(payload["max_tokens"], 1024);
        let messages = payload["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        // 未指定のパラメータはペイロードに含めない
        assert!(payload.get("temperature").is_none());
        assert!(payload.get("top_p").is_none());
        assert!(payload.get("stop").is_none());
    }

    #[test]
    fn test_make_request_payload_with_sampling_params() {
        let provider = OpenAiProvider::new("test-key");
        let params = SamplingParams {
            temperature: Some(0.7),
            top_p: Some(0.9),
            frequency_penalty: Some(0.5),
            presence_penalty: Some(-0.5),
            stop: vec!["END".to_string()],
        };
        let payload = provider.make_request_payload(&request(params)).unwrap();
        assert_eq!(payload["temperature"], 0.7);
        assert_eq!(payload["top_p"], 0.9);
        assert_eq!(payload["frequency_penalty"], 0.5);
        assert_eq!(payload["presence_penalty"], -0.5);
        assert_eq!(payload["stop"], serde_json::json!(["END"]));
    }

    #[test]
    fn test_parse_completion_extracts_content_and_usage() {
        let provider = OpenAiProvider::new("test-key");
        let response = r#"{
            "choices": [{"message": {"role": "assistant", "content": "Hi there"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        }"#;
        let completion = provider.parse_completion(response).unwrap();
        assert_eq!(completion.content, "Hi there");
        assert_eq!(completion.completion_tokens, Some(3));
    }

    #[test]
    fn test_parse_completion_without_usage() {
        let provider = OpenAiProvider::new("test-key");
        let response = r#"{"choices": [{"message": {"content": "Hi"}}]}"#;
        let completion = provider.parse_completion(response).unwrap();
        assert_eq!(completion.content, "Hi");
        assert_eq!(completion.completion_tokens, None);
    }

    #[test]
    fn test_parse_completion_error_body() {
        let provider = OpenAiProvider::new("test-key");
        let response = r#"{"error": {"message": "model not found"}}"#;
        let err = provider.parse_completion(response).unwrap_err();
        assert!(err.to_string().contains("model not found"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_parse_completion_no_text() {
        let provider = OpenAiProvider::new("test-key");
        let err = provider.parse_completion(r#"{"choices": []}"#).unwrap_err();
        assert!(err.to_string().contains("No text in response"));
    }

    #[test]
    fn test_classify_http_error_codes() {
        let auth = OpenAiProvider::classify_http_error(
            reqwest::StatusCode::UNAUTHORIZED,
            r#"{"error": {"message": "bad key"}}"#,
        );
        assert_eq!(auth.exit_code(), 77);
        assert!(!auth.is_retryable());

        let rate = OpenAiProvider::classify_http_error(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": {"message": "slow down"}}"#,
        );
        assert_eq!(rate.exit_code(), 75);
        assert!(rate.is_retryable());

        let unavail = OpenAiProvider::classify_http_error(
            reqwest::StatusCode::SERVICE_UNAVAILABLE,
            "upstream down",
        );
        assert!(unavail.is_retryable());

        let bad_request = OpenAiProvider::classify_http_error(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"error": {"message": "invalid"}}"#,
        );
        assert_eq!(bad_request.exit_code(), 74);
        assert!(!bad_request.is_retryable());
    }
}
