//! Outbound ポートの標準実装

pub mod key_store;
pub mod line_prompt;
pub mod llm_completion;
pub mod sigint_checker;
pub mod tiktoken_counter;
pub mod transcript_file;

pub use key_store::FileApiKeyStore;
pub use line_prompt::LinePrompt;
pub use llm_completion::StdChatCompletion;
pub use sigint_checker::{NoopInterruptChecker, SigintChecker};
pub use tiktoken_counter::TiktokenCounter;
pub use transcript_file::FileTranscriptStore;
