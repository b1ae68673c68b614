//! gpt-cli 共通ライブラリ
//!
//! `gpt-cli` コマンドの下回り（エラー型・構造化ログ・ファイル / 環境 / スリープの
//! ポートと標準アダプタ・ブロッキング LLM ドライバー）を提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Newtype）
pub mod domain;

/// Outbound ポート定義
pub mod ports;

/// 標準アダプタ実装
pub mod adapter;

/// LLM ドライバーとプロバイダ
pub mod llm;
