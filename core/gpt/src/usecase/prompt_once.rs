//! 一回だけ問い合わせるユースケース
//!
//! チャットループを回さず、引数のメッセージを1往復だけ送る。
//! 応答はストリーミングで受けてそのまま stdout へ流す。

use crate::domain::{Context, Role};
use crate::ports::outbound::{ChatCompletion, TokenCounter, TranscriptStore};
use crate::usecase::chat::{build_context, ChatSettings};
use common::error::Error;
use common::llm::CompletionRequest;
use std::io::Write;
use std::sync::Arc;

/// 一回問い合わせのユースケース
pub struct PromptUseCase {
    completion: Arc<dyn ChatCompletion>,
    counter: Arc<dyn TokenCounter>,
    transcripts: Arc<dyn TranscriptStore>,
}

impl PromptUseCase {
    pub fn new(
        completion: Arc<dyn ChatCompletion>,
        counter: Arc<dyn TokenCounter>,
        transcripts: Arc<dyn TranscriptStore>,
    ) -> Self {
        Self {
            completion,
            counter,
            transcripts,
        }
    }

    pub fn run(&self, settings: &ChatSettings, message: &str) -> Result<i32, Error> {
        let mut context =
            build_context(settings, Arc::clone(&self.counter), self.transcripts.as_ref())?;
        context.add_message(message, Role::User)?;
        self.save_if_requested(&context, settings)?;

        let fitted = context.get_fitted_messages(settings.budget.max_context_tokens, None);
        let request = CompletionRequest {
            model: context.model().name().to_string(),
            messages: Context::to_provider_format(&fitted),
            max_completion_tokens: settings.budget.max_completion_tokens,
            params: settings.params.clone(),
        };

        let completion = self.completion.complete_streaming(&request, &mut |chunk| {
            print!("{chunk}");
            std::io::stdout()
                .flush()
                .map_err(|e| Error::io_msg(e.to_string()))
        })?;
        println!();

        // ストリーミングでは usage が返らないのでローカルで数える
        context.add_message(&completion.content, Role::Assistant)?;
        self.save_if_requested(&context, settings)?;
        Ok(0)
    }

    fn save_if_requested(&self, context: &Context, settings: &ChatSettings) -> Result<(), Error> {
        if let Some(output) = &settings.output {
            self.transcripts.save(context, output)?;
        }
        Ok(())
    }
}
