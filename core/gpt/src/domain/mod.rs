//! gpt-cli 固有のドメイン型（型と不変条件）

pub mod budget;
pub mod command;
pub mod context;
pub mod message;
pub mod model;
pub mod role;
pub mod transcript;

pub use budget::ChatBudget;
pub use command::{ConversationOptions, GptCommand};
pub use context::Context;
pub use message::{Message, MessageError};
pub use model::OpenAiModel;
pub use role::Role;
pub use transcript::TranscriptError;
