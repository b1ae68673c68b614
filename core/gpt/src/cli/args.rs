use std::path::PathBuf;

use crate::domain::{ConversationOptions, GptCommand};
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;

/// 解析結果: 通常のコマンド / 補完スクリプト生成 / ヘルプ表示
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Command(GptCommand),
    GenerateCompletion(Shell),
    /// -h/--help が指定された（clap が描画したテキストをそのまま表示して終了）
    Help(String),
}

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// chat / prompt で共通の会話オプションを追加する
fn conversation_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(
            clap::Arg::new("input")
                .short('i')
                .long("input")
                .value_name("path")
                .help("Load conversation history from this file before starting")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .value_name("path")
                .help("Save conversation history to this file after every turn")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("model")
                .short('m')
                .long("model")
                .value_name("model")
                .help("OpenAI model name (e.g. gpt-4o, gpt-4o-mini)")
                .default_value(DEFAULT_MODEL)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("system")
                .short('S')
                .long("system")
                .value_name("instruction")
                .help("Set the system message for this conversation")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("max-context-tokens")
                .long("max-context-tokens")
                .value_name("n")
                .help("Token budget for the prompt context (default: model window minus completion budget)")
                .value_parser(value_parser!(usize))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("max-completion-tokens")
                .long("max-completion-tokens")
                .value_name("n")
                .help("Token budget for the completion (default: derived from the model limits)")
                .value_parser(value_parser!(usize))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("temperature")
                .short('t')
                .long("temperature")
                .value_name("x")
                .help("Sampling temperature, 0.0 to 2.0")
                .value_parser(value_parser!(f64))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("top-p")
                .long("top-p")
                .value_name("x")
                .help("Nucleus sampling probability mass, 0.0 to 1.0")
                .value_parser(value_parser!(f64))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("presence-penalty")
                .long("presence-penalty")
                .value_name("x")
                .help("Presence penalty, -2.0 to 2.0")
                .value_parser(value_parser!(f64))
                .allow_negative_numbers(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("frequency-penalty")
                .long("frequency-penalty")
                .value_name("x")
                .help("Frequency penalty, -2.0 to 2.0")
                .value_parser(value_parser!(f64))
                .allow_negative_numbers(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("stop")
                .long("stop")
                .value_name("sequence")
                .help("Stop sequence (repeatable, at most 4 are sent)")
                .action(ArgAction::Append)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("nowarning")
                .long("nowarning")
                .help("Suppress warnings about adjusted or ignored parameters")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("openai-api-key")
                .long("openai-api-key")
                .value_name("key")
                .help("OpenAI API key (overrides OPENAI_API_KEY and the stored key file)")
                .num_args(1),
        )
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("gpt-cli")
        .about("Chat with OpenAI models from the command line")
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
        .subcommand(
            clap::Command::new("init")
                .about("Prompt for an OpenAI API key and store it in the config directory")
                .arg(
                    clap::Arg::new("noconfirm")
                        .long("noconfirm")
                        .help("Do not ask for confirmation before writing the key file")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            clap::Command::new("deinit")
                .about("Remove the stored OpenAI API key")
                .arg(
                    clap::Arg::new("noconfirm")
                        .long("noconfirm")
                        .help("Do not ask for confirmation before removing the key file")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(conversation_args(
            clap::Command::new("chat").about("Start an interactive conversation"),
        ))
        .subcommand(
            conversation_args(
                clap::Command::new("prompt").about("Send a single message and print the reply"),
            )
            .arg(
                clap::Arg::new("message")
                    .index(1)
                    .value_name("message")
                    .help("Message words (joined with spaces)")
                    .num_args(1..)
                    .trailing_var_arg(true)
                    .required(true),
            ),
        )
}

fn matches_to_options(matches: &clap::ArgMatches) -> ConversationOptions {
    let stop: Vec<String> = matches
        .get_many::<String>("stop")
        .map(|i| i.cloned().collect())
        .unwrap_or_default();

    ConversationOptions {
        model: matches
            .get_one::<String>("model")
            .cloned()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        system: matches.get_one::<String>("system").cloned(),
        input: matches.get_one::<PathBuf>("input").cloned(),
        output: matches.get_one::<PathBuf>("output").cloned(),
        max_context_tokens: matches.get_one::<usize>("max-context-tokens").copied(),
        max_completion_tokens: matches.get_one::<usize>("max-completion-tokens").copied(),
        temperature: matches.get_one::<f64>("temperature").copied(),
        top_p: matches.get_one::<f64>("top-p").copied(),
        presence_penalty: matches.get_one::<f64>("presence-penalty").copied(),
        frequency_penalty: matches.get_one::<f64>("frequency-penalty").copied(),
        stop,
        nowarning: matches.get_flag("nowarning"),
        openai_api_key: matches.get_one::<String>("openai-api-key").cloned(),
    }
}

fn matches_to_outcome(matches: &clap::ArgMatches) -> Result<ParseOutcome, Error> {
    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    let command = match matches.subcommand() {
        Some(("init", sub)) => GptCommand::Init {
            noconfirm: sub.get_flag("noconfirm"),
        },
        Some(("deinit", sub)) => GptCommand::Deinit {
            noconfirm: sub.get_flag("noconfirm"),
        },
        Some(("chat", sub)) => GptCommand::Chat(matches_to_options(sub)),
        Some(("prompt", sub)) => {
            let words: Vec<String> = sub
                .get_many::<String>("message")
                .map(|i| i.cloned().collect())
                .unwrap_or_default();
            GptCommand::Prompt {
                options: matches_to_options(sub),
                message: words.join(" "),
            }
        }
        _ => {
            return Err(Error::invalid_argument(
                "No command provided. Use one of: init, deinit, chat, prompt.",
            ))
        }
    };

    Ok(ParseOutcome::Command(command))
}

/// コマンドラインを解析する。補完生成やヘルプ表示が要求された場合は対応する ParseOutcome を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let cmd = build_clap_command();
    match cmd.try_get_matches() {
        Ok(matches) => matches_to_outcome(&matches),
        Err(e)
            if matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            Ok(ParseOutcome::Help(e.to_string()))
        }
        Err(e) => Err(Error::invalid_argument(e.to_string())),
    }
}

/// テスト用: 引数スライスから解析する
#[allow(dead_code)]
pub fn parse_args_from(args: &[String]) -> Result<ParseOutcome, Error> {
    let cmd = build_clap_command();
    let matches = cmd
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    matches_to_outcome(&matches)
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "gpt-cli", &mut std::io::stdout());
}
