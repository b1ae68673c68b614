//! CLI 引数解析

pub mod args;

pub use args::{parse_args, print_completion, ParseOutcome};

#[cfg(test)]
pub use args::parse_args_from;
