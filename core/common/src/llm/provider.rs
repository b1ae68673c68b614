//! LLMプロバイダのトレイト定義

use crate::error::Error;
use crate::llm::params::SamplingParams;
use serde::Serialize;
use serde_json::Value;

/// ワイヤ形式のメッセージ（role と content のみ）
///
/// トークン数やモデル名は API に送らない。Context 側の Message から
/// 射影されてここに渡ってくる。
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// completion リクエスト一式
///
/// メッセージ列は既に予算内に収まっている前提（収める責務は呼び出し側）。
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// 応答の出力トークン上限
    pub max_completion_tokens: usize,
    pub params: SamplingParams,
}

/// completion レスポンスの要約
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    /// API の usage 会計から得た応答トークン数（ストリーミング時は得られない）
    pub completion_tokens: Option<usize>,
}

/// LLMプロバイダのトレイト
///
/// 各プロバイダ（OpenAI、Echo など）はこのトレイトを実装する。
pub trait LlmProvider {
    /// プロバイダ名を返す
    fn name(&self) -> &str;

    /// リクエストペイロードを生成
    ///
    /// # Arguments
    /// * `request` - completion リクエスト一式
    ///
    /// # Returns
    /// * `Ok(Value)` - リクエストJSON
    /// * `Err(Error)` - ペイロード生成の失敗
    fn make_request_payload(&self, request: &CompletionRequest) -> Result<Value, Error>;

    /// HTTPリクエストを実行してレスポンスを取得
    ///
    /// # Arguments
    /// * `request_json` - リクエストJSON文字列
    ///
    /// # Returns
    /// * `Ok(String)` - レスポンスJSON文字列
    /// * `Err(Error)` - HTTP ステータスに応じて分類したエラー
    fn execute(&self, request_json: &str) -> Result<String, Error>;

    /// レスポンスから応答テキストと usage を抽出
    ///
    /// # Arguments
    /// * `response_json` - レスポンスJSON文字列
    ///
    /// # Returns
    /// * `Ok(Completion)` - 応答テキストと応答トークン数
    /// * `Err(Error)` - 応答が空、または JSON 解析の失敗
    fn parse_completion(&self, response_json: &str) -> Result<Completion, Error>;

    /// ストリーミングHTTPリクエストを実行
    ///
    /// テキストデルタを受信するたびに `on_delta` を呼ぶ。
    /// 戻り値の Completion は全デルタを連結したもの。
    ///
    /// # Arguments
    /// * `request_json` - リクエストJSON文字列
    /// * `on_delta` - テキストチャンクを受け取るコールバック
    fn execute_streaming(
        &self,
        request_json: &str,
        on_delta: &mut dyn FnMut(&str) -> Result<(), Error>,
    ) -> Result<Completion, Error>;
}
