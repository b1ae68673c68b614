mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::process;

use cli::{parse_args, print_completion, ParseOutcome};
use common::error::Error;
use common::llm::SamplingParams;
use common::ports::outbound::{now_iso8601, LogLevel, LogRecord};
use domain::{ChatBudget, ConversationOptions, GptCommand, OpenAiModel};
use ports::inbound::CommandRunner;
use usecase::ChatSettings;
use wiring::{wire_app, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl CommandRunner for Runner {
    fn run(&self, command: GptCommand) -> Result<i32, Error> {
        let command_name = cmd_name_for_log(&command);
        let _ = self.app.logger.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "command started".to_string(),
            layer: Some("cli".to_string()),
            kind: Some("lifecycle".to_string()),
            fields: {
                let mut m = std::collections::BTreeMap::new();
                m.insert("command".to_string(), serde_json::json!(command_name));
                Some(m)
            },
        });

        let result = match command {
            GptCommand::Init { noconfirm } => self.app.init_use_case().init(noconfirm),
            GptCommand::Deinit { noconfirm } => self.app.init_use_case().deinit(noconfirm),
            GptCommand::Chat(options) => {
                let settings = settings_from_options(&options)?;
                let api_key = self.app.keys.resolve(options.openai_api_key.as_deref())?;
                self.app.chat_use_case(&api_key).run(&settings)
            }
            GptCommand::Prompt { options, message } => {
                if message.trim().is_empty() {
                    return Err(Error::invalid_argument("No message provided."));
                }
                let settings = settings_from_options(&options)?;
                let api_key = self.app.keys.resolve(options.openai_api_key.as_deref())?;
                self.app.prompt_use_case(&api_key).run(&settings, &message)
            }
        };

        let code = result.as_ref().copied().unwrap_or(0);
        let _ = self.app.logger.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "command finished".to_string(),
            layer: Some("cli".to_string()),
            kind: Some("lifecycle".to_string()),
            fields: {
                let mut m = std::collections::BTreeMap::new();
                m.insert("command".to_string(), serde_json::json!(command_name));
                m.insert("exit_code".to_string(), serde_json::json!(code));
                Some(m)
            },
        });
        if let Err(ref e) = result {
            let _ = self.app.logger.log(&LogRecord {
                ts: now_iso8601(),
                level: LogLevel::Error,
                message: e.to_string(),
                layer: Some("cli".to_string()),
                kind: Some("error".to_string()),
                fields: None,
            });
        }
        result
    }
}

/// CLI オプションから 1 セッション分の設定を解決する
///
/// モデル解決・トークン予算・サンプリングパラメータの検証をここで済ませ、
/// 警告は --nowarning でなければ stderr へ出す。
fn settings_from_options(options: &ConversationOptions) -> Result<ChatSettings, Error> {
    let model = OpenAiModel::resolve(&options.model)?;
    let budget = ChatBudget::resolve(
        &model,
        options.max_context_tokens,
        options.max_completion_tokens,
    )?;
    let mut params = SamplingParams {
        temperature: options.temperature,
        top_p: options.top_p,
        frequency_penalty: options.frequency_penalty,
        presence_penalty: options.presence_penalty,
        stop: options.stop.clone(),
    };
    let warnings = params.validate()?;
    if !options.nowarning {
        for warning in &warnings {
            eprintln!("gpt-cli: warning: {warning}");
        }
    }
    Ok(ChatSettings {
        model,
        budget,
        params,
        system: options.system.clone(),
        input: options.input.clone(),
        output: options.output.clone(),
        nowarning: options.nowarning,
    })
}

fn cmd_name_for_log(command: &GptCommand) -> &'static str {
    match command {
        GptCommand::Init { .. } => "init",
        GptCommand::Deinit { .. } => "deinit",
        GptCommand::Chat(_) => "chat",
        GptCommand::Prompt { .. } => "prompt",
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("gpt-cli: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let command = match parse_args()? {
        ParseOutcome::Command(command) => command,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
        ParseOutcome::Help(text) => {
            println!("{}", text);
            return Ok(0);
        }
    };
    let app = wire_app();
    let runner = Runner { app };
    runner.run(command)
}

fn print_usage() {
    eprintln!("Usage: gpt-cli [--generate <shell>] <init|deinit|chat|prompt> [options]");
}
