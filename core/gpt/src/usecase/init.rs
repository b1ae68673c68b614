//! APIキーの設定・削除ユースケース

use crate::ports::outbound::{ApiKeyStore, UserPrompt};
use common::error::Error;
use std::sync::Arc;

/// init / deinit のユースケース
pub struct InitUseCase {
    keys: Arc<dyn ApiKeyStore>,
    prompt: Arc<dyn UserPrompt>,
}

impl InitUseCase {
    pub fn new(keys: Arc<dyn ApiKeyStore>, prompt: Arc<dyn UserPrompt>) -> Self {
        Self { keys, prompt }
    }

    /// APIキーを入力させて鍵ファイルへ保存する
    ///
    /// 保存先・上書きの確認を挟む（--noconfirm で省略）。確認で
    /// 拒否された場合は何もせず終了コード1。
    pub fn init(&self, noconfirm: bool) -> Result<i32, Error> {
        let api_key = match self.prompt.read_input("OpenAI API key: ")? {
            Some(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => return Err(Error::invalid_argument("No API key provided.")),
        };

        let path = self.keys.path()?;
        if !noconfirm {
            let question = format!(
                "OpenAI API key will be saved to {}, okay?",
                path.display()
            );
            if !self.prompt.confirm(&question)? {
                return Ok(1);
            }
            if self.keys.exists()? {
                let question = format!(
                    "File {} already exists. Do you want to overwrite it?",
                    path.display()
                );
                if !self.prompt.confirm(&question)? {
                    return Ok(1);
                }
            }
        }

        self.keys.save(&api_key)?;
        Ok(0)
    }

    /// 鍵ファイルを削除する
    pub fn deinit(&self, noconfirm: bool) -> Result<i32, Error> {
        let path = self.keys.path()?;
        if !self.keys.exists()? {
            eprintln!(
                "gpt-cli: warning: file {} does not exist: nothing to remove.",
                path.display()
            );
            return Ok(0);
        }

        if !noconfirm {
            let question = format!(
                "OpenAI API key will be removed from {}, okay?",
                path.display()
            );
            if !self.prompt.confirm(&question)? {
                return Ok(1);
            }
        }

        self.keys.remove()?;
        Ok(0)
    }
}
