//! 会話上の役割（role）
//!
//! system / user / assistant の閉じた列挙。role に依存する分岐は
//! すべてこの enum の網羅的 match で行う（文字列比較はしない）。

use std::fmt;

/// メッセージの役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// ワイヤ形式・構造化 transcript で使う小文字表記
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// 構造化 transcript の role 値を解析する。未知の値は None
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "system" => Some(Role::System),
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }

    /// レガシー transcript のラベル行（`System:` など）を解析する
    pub fn parse_label_line(line: &str) -> Option<Role> {
        match line {
            "System:" => Some(Role::System),
            "User:" => Some(Role::User),
            "Assistant:" => Some(Role::Assistant),
            _ => None,
        }
    }

    /// レガシー transcript で使うラベル（`System:` など）
    pub fn label(&self) -> &'static str {
        match self {
            Role::System => "System:",
            Role::User => "User:",
            Role::Assistant => "Assistant:",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_round_trips_through_parse() {
        for role in [Role::System, Role::User, Role::Assistant] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_role() {
        assert_eq!(Role::parse("moderator"), None);
        assert_eq!(Role::parse("System"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_parse_label_line_is_exact() {
        assert_eq!(Role::parse_label_line("System:"), Some(Role::System));
        assert_eq!(Role::parse_label_line("User:"), Some(Role::User));
        assert_eq!(Role::parse_label_line("Assistant:"), Some(Role::Assistant));
        // 前後に余計な文字があればラベル行ではない
        assert_eq!(Role::parse_label_line("System: hello"), None);
        assert_eq!(Role::parse_label_line(" System:"), None);
        assert_eq!(Role::parse_label_line("system:"), None);
    }
}
