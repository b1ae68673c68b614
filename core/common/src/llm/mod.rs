//! LLM 連携モジュール
//!
//! chat-completion API への問い合わせに関わる共通部品。
//! プロバイダのトレイト（provider）、サンプリングパラメータ（params）、
//! リトライ方針（retry）、OpenAI 実装（openai）、オフライン実装（echo）、
//! そしてリトライ込みの呼び出しを束ねるドライバー（driver）からなる。

pub mod driver;
pub mod echo;
pub mod openai;
pub mod params;
pub mod provider;
pub mod retry;

pub use driver::LlmDriver;
pub use echo::EchoProvider;
pub use openai::OpenAiProvider;
pub use params::SamplingParams;
pub use provider::{ChatMessage, Completion, CompletionRequest, LlmProvider};
pub use retry::RetryPolicy;
