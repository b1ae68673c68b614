//! 対話チャットのユースケース
//!
//! 入力 → Context へ追加 → 予算内のメッセージ列で API 呼び出し →
//! 応答を Context へ追加、の繰り返し。ユーザー入力はネットワーク
//! 呼び出しの前に追加・保存する。呼び出し中にプロセスが落ちても
//! 入力済みの transcript が残り、再開できるようにするため。

use crate::domain::{ChatBudget, Context, OpenAiModel, Role};
use crate::ports::outbound::{
    ChatCompletion, InterruptChecker, TokenCounter, TranscriptStore, UserPrompt,
};
use common::error::Error;
use common::llm::{Completion, CompletionRequest, SamplingParams};
use common::ports::outbound::{now_iso8601, Log, LogLevel, LogRecord};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// system が指定も読み込みもされなかったときの既定値
pub const DEFAULT_SYSTEM: &str =
    "You are a helpful assistant. Answer as concisely as possible.";

/// チャット終了の合言葉
const EXIT_SENTINELS: &[&str] = &["exit", "quit", ":q"];

/// 1セッション分の設定（解決済み）
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model: OpenAiModel,
    pub budget: ChatBudget,
    pub params: SamplingParams,
    pub system: Option<String>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub nowarning: bool,
}

/// 設定から Context を組み立てる
///
/// --input があれば読み込み、--system があれば読み込んだ system を
/// 上書きする（上書き時は警告）。どちらも無ければ既定の system。
pub fn build_context(
    settings: &ChatSettings,
    counter: Arc<dyn TokenCounter>,
    transcripts: &dyn TranscriptStore,
) -> Result<Context, Error> {
    let mut context = Context::new(settings.model.clone(), counter);
    if let Some(input) = &settings.input {
        transcripts.load_into(&mut context, input)?;
    }
    match &settings.system {
        Some(system) => {
            if context.is_system_set() && !settings.nowarning {
                eprintln!(
                    "gpt-cli: warning: ignoring system from history because \
                     system was provided via command line."
                );
            }
            context.set_system(system)?;
        }
        None => {
            if !context.is_system_set() {
                context.set_system(DEFAULT_SYSTEM)?;
            }
        }
    }
    Ok(context)
}

/// 対話チャットのユースケース
pub struct ChatUseCase {
    completion: Arc<dyn ChatCompletion>,
    counter: Arc<dyn TokenCounter>,
    transcripts: Arc<dyn TranscriptStore>,
    prompt: Arc<dyn UserPrompt>,
    interrupt: Arc<dyn InterruptChecker>,
    log: Arc<dyn Log>,
}

impl ChatUseCase {
    pub fn new(
        completion: Arc<dyn ChatCompletion>,
        counter: Arc<dyn TokenCounter>,
        transcripts: Arc<dyn TranscriptStore>,
        prompt: Arc<dyn UserPrompt>,
        interrupt: Arc<dyn InterruptChecker>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            completion,
            counter,
            transcripts,
            prompt,
            interrupt,
            log,
        }
    }

    /// チャットループを回す。終了の合言葉・EOF・Ctrl+C で 0 を返す
    pub fn run(&self, settings: &ChatSettings) -> Result<i32, Error> {
        let mut context =
            build_context(settings, Arc::clone(&self.counter), self.transcripts.as_ref())?;
        loop {
            if self.interrupt.is_interrupted() {
                return Ok(0);
            }
            if Self::needs_user_input(&context) {
                let input = match self.prompt.read_input("> ")? {
                    Some(input) => input,
                    None => return Ok(0),
                };
                let trimmed = input.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if EXIT_SENTINELS.contains(&trimmed.to_lowercase().as_str()) {
                    return Ok(0);
                }
                context.add_message(&input, Role::User)?;
                self.save_if_requested(&context, settings)?;
            }

            let completion = self.request_completion(&context, settings)?;
            self.append_assistant_reply(&mut context, &completion)?;

            println!();
            println!("{}", completion.content);
            println!();

            self.save_if_requested(&context, settings)?;
            self.log_turn(&context, &completion);
        }
    }

    /// 次のターンでユーザー入力が要るか（最後が user でなければ要る）
    fn needs_user_input(context: &Context) -> bool {
        match context.messages().last() {
            Some(last) => last.role() != Role::User,
            None => true,
        }
    }

    fn request_completion(
        &self,
        context: &Context,
        settings: &ChatSettings,
    ) -> Result<Completion, Error> {
        let fitted = context.get_fitted_messages(settings.budget.max_context_tokens, None);
        let request = CompletionRequest {
            model: context.model().name().to_string(),
            messages: Context::to_provider_format(&fitted),
            max_completion_tokens: settings.budget.max_completion_tokens,
            params: settings.params.clone(),
        };
        self.completion.complete(&request)
    }

    /// 応答を Context へ追加する
    ///
    /// API の usage 会計があればそのトークン数を信用し、無ければ
    /// ローカルで数え直す。
    fn append_assistant_reply(
        &self,
        context: &mut Context,
        completion: &Completion,
    ) -> Result<(), Error> {
        match completion.completion_tokens {
            Some(n) => {
                context.add_message_with_token_count(&completion.content, Role::Assistant, n)
            }
            None => context.add_message(&completion.content, Role::Assistant),
        }
    }

    fn save_if_requested(&self, context: &Context, settings: &ChatSettings) -> Result<(), Error> {
        if let Some(output) = &settings.output {
            self.transcripts.save(context, output)?;
        }
        Ok(())
    }

    fn log_turn(&self, context: &Context, completion: &Completion) {
        let _ = self.log.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "turn completed".to_string(),
            layer: Some("usecase".to_string()),
            kind: Some("chat".to_string()),
            fields: {
                let mut m = BTreeMap::new();
                m.insert(
                    "transcript_len".to_string(),
                    serde_json::json!(context.messages().len()),
                );
                m.insert(
                    "completion_tokens".to_string(),
                    serde_json::json!(completion.completion_tokens),
                );
                Some(m)
            },
        });
    }
}
