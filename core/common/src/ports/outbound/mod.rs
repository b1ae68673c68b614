//! Outbound ポート（usecase から外界へ向かう trait）

mod env_resolver;
mod fs;
mod log;
mod sleeper;

pub use env_resolver::EnvResolver;
pub use fs::{FileMetadata, FileSystem};
pub use log::{now_iso8601, Log, LogLevel, LogRecord};
pub use sleeper::Sleeper;
