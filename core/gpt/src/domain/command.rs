//! CLI から渡されるコマンドの表現

use std::path::PathBuf;

/// chat / prompt 共通の会話設定
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationOptions {
    pub model: String,
    pub system: Option<String>,
    /// 既存 transcript を読み込むパス
    pub input: Option<PathBuf>,
    /// 毎ターン transcript を書き出すパス
    pub output: Option<PathBuf>,
    pub max_context_tokens: Option<usize>,
    pub max_completion_tokens: Option<usize>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub stop: Vec<String>,
    pub nowarning: bool,
    pub openai_api_key: Option<String>,
}

/// 実行するコマンド
#[derive(Debug, Clone, PartialEq)]
pub enum GptCommand {
    /// APIキーを設定ファイルに保存する
    Init { noconfirm: bool },
    /// 保存済みAPIキーを削除する
    Deinit { noconfirm: bool },
    /// 対話チャットを開始する
    Chat(ConversationOptions),
    /// 一回だけ問い合わせて応答を表示する
    Prompt {
        options: ConversationOptions,
        message: String,
    },
}
