//! Ports & Adapters のポート定義
//!
//! - inbound: ドライバ（CLI）がアプリを呼び出すインターフェース
//! - outbound: アプリが外界（トークナイザ・API・端末・鍵置き場）を使うための trait

pub mod inbound;
pub mod outbound;
