//! 標準入出力による UserPrompt 実装
//!
//! 複数行入力はバックスラッシュ継続。行末が `\` の間は次の行を読み
//! 続け、継続記号を落として改行で連結する。各行は前後の空白を落とす。

use crate::ports::outbound::UserPrompt;
use common::error::Error;
use std::io::{self, BufRead, Write};

/// stdin/stderr を使う UserPrompt 実装
#[derive(Debug, Clone, Default)]
pub struct LinePrompt;

impl LinePrompt {
    pub fn new() -> Self {
        Self
    }

    fn read_raw_line() -> Result<Option<String>, Error> {
        let stdin = io::stdin();
        let mut line = String::new();
        let n = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| Error::io_msg(e.to_string()))?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

impl UserPrompt for LinePrompt {
    fn read_input(&self, prompt: &str) -> Result<Option<String>, Error> {
        eprint!("{prompt}");
        let _ = io::stderr().flush();

        let mut lines: Vec<String> = Vec::new();
        loop {
            let line = match Self::read_raw_line()? {
                Some(line) => line,
                None if lines.is_empty() => return Ok(None),
                None => break,
            };
            let trimmed = line.trim();
            if let Some(stripped) = trimmed.strip_suffix('\\') {
                lines.push(stripped.trim_end().to_string());
                eprint!("  ");
                let _ = io::stderr().flush();
            } else {
                lines.push(trimmed.to_string());
                break;
            }
        }
        Ok(Some(lines.join("\n")))
    }

    fn confirm(&self, question: &str) -> Result<bool, Error> {
        eprint!("{question} [y/N]: ");
        let _ = io::stderr().flush();
        let answer = Self::read_raw_line()?.unwrap_or_default();
        let answer = answer.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}
