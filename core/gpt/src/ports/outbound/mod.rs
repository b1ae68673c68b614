//! Outbound ポート: アプリが外界を使うための trait 集

pub mod api_key_store;
pub mod completion;
pub mod interrupt;
pub mod token_counter;
pub mod transcript_store;
pub mod user_prompt;

pub use api_key_store::ApiKeyStore;
pub use completion::ChatCompletion;
pub use interrupt::InterruptChecker;
pub use token_counter::TokenCounter;
pub use transcript_store::TranscriptStore;
pub use user_prompt::UserPrompt;
