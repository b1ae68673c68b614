//! ユースケース層

pub mod chat;
pub mod init;
pub mod prompt_once;

pub use chat::{ChatSettings, ChatUseCase};
pub use init::InitUseCase;
pub use prompt_once::PromptUseCase;
