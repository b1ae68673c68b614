//! エラーハンドリング
//!
//! CLI 全体で使うエラー型。メッセージと終了コード区分（sysexits 準拠）を持ち、
//! リトライ可否の判定（`is_retryable`）もここで行う。
//! 一時的なリモートエラー（レート制限・5xx・接続失敗）だけがリトライ対象。

use thiserror::Error as ThisError;

/// CLI 全体のエラー型
///
/// バリアントは「どう扱うか」（終了コード・usage 表示・リトライ可否）で分ける。
/// ドメイン固有のエラー（message / transcript）は各ドメイン型からここへ変換する。
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// 引数不正（usage 表示対象）
    #[error("{0}")]
    InvalidArgument(String),
    /// 入力データ形式の不正（transcript の破損・未知の role など）
    #[error("{0}")]
    DataFormat(String),
    /// I/O 失敗
    #[error("{0}")]
    Io(String),
    /// レート制限（一時的・リトライ対象）
    #[error("{0}")]
    RateLimited(String),
    /// サービス利用不可（5xx、一時的・リトライ対象）
    #[error("{0}")]
    Unavailable(String),
    /// 接続失敗（一時的・リトライ対象）
    #[error("{0}")]
    Connection(String),
    /// 認証失敗（致命的・リトライしない）
    #[error("{0}")]
    Auth(String),
    /// 上記以外の API エラー（致命的）
    #[error("{0}")]
    Api(String),
    /// 設定不正（未知のモデル・プロファイルなど）
    #[error("{0}")]
    Config(String),
    /// 環境変数の欠如
    #[error("{0}")]
    Env(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn data_format(msg: impl Into<String>) -> Self {
        Error::DataFormat(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Error::RateLimited(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Error::Unavailable(msg.into())
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        Error::Connection(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Error::Auth(msg.into())
    }

    pub fn api(msg: impl Into<String>) -> Self {
        Error::Api(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Error::Env(msg.into())
    }

    /// 終了コード（sysexits 準拠）
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) => 64,
            Error::DataFormat(_) => 65,
            Error::Io(_) | Error::Api(_) => 74,
            Error::RateLimited(_) | Error::Unavailable(_) | Error::Connection(_) => 75,
            Error::Auth(_) => 77,
            Error::Config(_) | Error::Env(_) => 78,
        }
    }

    /// usage を表示すべきエラーか（引数不正のみ）
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// リトライ対象の一時的エラーか
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::RateLimited(_) | Error::Unavailable(_) | Error::Connection(_)
        )
    }

    /// リトライ警告などで使う短い種別名
    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::InvalidArgument(_) => "invalid argument",
            Error::DataFormat(_) => "data format error",
            Error::Io(_) => "I/O error",
            Error::RateLimited(_) => "rate limited",
            Error::Unavailable(_) => "service unavailable",
            Error::Connection(_) => "connection error",
            Error::Auth(_) => "authentication error",
            Error::Api(_) => "API error",
            Error::Config(_) => "configuration error",
            Error::Env(_) => "environment error",
        }
    }
}
