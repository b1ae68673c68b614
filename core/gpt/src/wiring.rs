//! 配線: 標準アダプタで UseCase を組み立てる

use std::sync::Arc;

use common::adapter::{FileJsonLog, NoopLog, StdEnvResolver, StdFileSystem, StdSleeper};
use common::llm::{LlmDriver, OpenAiProvider, RetryPolicy};
use common::ports::outbound::{EnvResolver, FileSystem, Log};

use crate::adapter::{
    FileApiKeyStore, FileTranscriptStore, LinePrompt, NoopInterruptChecker, SigintChecker,
    StdChatCompletion, TiktokenCounter,
};
use crate::ports::outbound::{
    ApiKeyStore, ChatCompletion, InterruptChecker, TokenCounter, TranscriptStore, UserPrompt,
};
use crate::usecase::{ChatUseCase, InitUseCase, PromptUseCase};

/// 標準アダプタ一式。コマンドごとの UseCase はここから組み立てる。
pub struct App {
    pub keys: Arc<dyn ApiKeyStore>,
    pub logger: Arc<dyn Log>,
    counter: Arc<dyn TokenCounter>,
    transcripts: Arc<dyn TranscriptStore>,
    prompt: Arc<dyn UserPrompt>,
    interrupt: Arc<dyn InterruptChecker>,
}

impl App {
    /// API キーを受け取って対話チャットの UseCase を組み立てる
    pub fn chat_use_case(&self, api_key: &str) -> ChatUseCase {
        ChatUseCase::new(
            self.completion(api_key),
            Arc::clone(&self.counter),
            Arc::clone(&self.transcripts),
            Arc::clone(&self.prompt),
            Arc::clone(&self.interrupt),
            Arc::clone(&self.logger),
        )
    }

    /// API キーを受け取って単発問い合わせの UseCase を組み立てる
    pub fn prompt_use_case(&self, api_key: &str) -> PromptUseCase {
        PromptUseCase::new(
            self.completion(api_key),
            Arc::clone(&self.counter),
            Arc::clone(&self.transcripts),
        )
    }

    pub fn init_use_case(&self) -> InitUseCase {
        InitUseCase::new(Arc::clone(&self.keys), Arc::clone(&self.prompt))
    }

    fn completion(&self, api_key: &str) -> Arc<dyn ChatCompletion> {
        let driver = LlmDriver::new(
            OpenAiProvider::new(api_key),
            RetryPolicy::default(),
            Arc::new(StdSleeper),
        );
        Arc::new(StdChatCompletion::new(driver, Arc::clone(&self.logger)))
    }
}

/// 配線: 標準アダプタで App を組み立てる
pub fn wire_app() -> App {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env: Arc<dyn EnvResolver> = Arc::new(StdEnvResolver);
    let logger = build_logger(&fs, &env);
    let keys: Arc<dyn ApiKeyStore> =
        Arc::new(FileApiKeyStore::new(Arc::clone(&fs), Arc::clone(&env)));
    let counter: Arc<dyn TokenCounter> = Arc::new(TiktokenCounter::new());
    let transcripts: Arc<dyn TranscriptStore> = Arc::new(FileTranscriptStore::new(Arc::clone(&fs)));
    let prompt: Arc<dyn UserPrompt> = Arc::new(LinePrompt::new());
    // SIGINT ハンドラの登録に失敗したら割り込みなしで続行する
    let interrupt: Arc<dyn InterruptChecker> = match SigintChecker::new() {
        Ok(checker) => Arc::new(checker),
        Err(_) => Arc::new(NoopInterruptChecker::new()),
    };
    App {
        keys,
        logger,
        counter,
        transcripts,
        prompt,
        interrupt,
    }
}

/// 設定ディレクトリが解決できればそこへ JSONL ログを書く。できなければ無効化。
fn build_logger(fs: &Arc<dyn FileSystem>, env: &Arc<dyn EnvResolver>) -> Arc<dyn Log> {
    match env.resolve_config_dir() {
        Ok(config_dir) => {
            let path = config_dir.join("logs").join("gpt-cli.jsonl");
            Arc::new(FileJsonLog::new(Arc::clone(fs), path))
        }
        Err(_) => Arc::new(NoopLog),
    }
}
