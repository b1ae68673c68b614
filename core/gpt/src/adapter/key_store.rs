//! APIキーの鍵ファイル実装
//!
//! 置き場所は設定ディレクトリ直下の `openai_api_key`。保存時は
//! 所有者のみ読み書き可（0600）にする。

use crate::ports::outbound::ApiKeyStore;
use common::error::Error;
use common::ports::outbound::{EnvResolver, FileSystem};
use std::path::PathBuf;
use std::sync::Arc;

const API_KEY_FILENAME: &str = "openai_api_key";

/// 設定ディレクトリの鍵ファイルを使う ApiKeyStore 実装
pub struct FileApiKeyStore {
    fs: Arc<dyn FileSystem>,
    env: Arc<dyn EnvResolver>,
}

impl FileApiKeyStore {
    pub fn new(fs: Arc<dyn FileSystem>, env: Arc<dyn EnvResolver>) -> Self {
        Self { fs, env }
    }
}

impl ApiKeyStore for FileApiKeyStore {
    fn resolve(&self, flag_value: Option<&str>) -> Result<String, Error> {
        if let Some(key) = flag_value {
            if !key.trim().is_empty() {
                return Ok(key.trim().to_string());
            }
        }
        if let Some(key) = self.env.api_key_from_env() {
            return Ok(key);
        }
        let path = self.path()?;
        if !self.fs.exists(&path) {
            return Err(Error::config(format!(
                "{} does not exist: could not read OpenAI API key. \
                 Have you already run 'gpt-cli init'?",
                path.display()
            )));
        }
        let key = self.fs.read_to_string(&path)?;
        Ok(key.trim().to_string())
    }

    fn save(&self, api_key: &str) -> Result<(), Error> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        self.fs.write(&path, api_key)?;
        self.fs.set_mode(&path, 0o600)
    }

    fn remove(&self) -> Result<(), Error> {
        let path = self.path()?;
        self.fs.remove_file(&path)
    }

    fn path(&self) -> Result<PathBuf, Error> {
        let dir = self.env.resolve_config_dir()?;
        Ok(dir.join(API_KEY_FILENAME))
    }

    fn exists(&self) -> Result<bool, Error> {
        let path = self.path()?;
        Ok(self.fs.exists(&path))
    }
}
