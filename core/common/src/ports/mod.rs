//! ポート定義（usecase / adapter 境界の trait）

pub mod outbound;
