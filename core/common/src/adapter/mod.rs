//! 標準アダプタ実装（Outbound ポートの実装）

mod file_json_log;
mod std_env_resolver;
mod std_fs;
mod std_sleeper;

pub use file_json_log::{FileJsonLog, NoopLog};
pub use std_env_resolver::StdEnvResolver;
pub use std_fs::StdFileSystem;
pub use std_sleeper::StdSleeper;
