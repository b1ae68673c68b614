//! 会話の1ターンを表す Message
//!
//! 構築後は不変。トークン数は構築時に一度だけ計算し、以後キャッシュとして
//! 持つ（content と乖離しうる可変フィールドにはしない）。

use crate::domain::role::Role;
use crate::ports::outbound::TokenCounter;
use common::error::Error;
use thiserror::Error as ThisError;

/// Message 構築時のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum MessageError {
    /// content 未設定は system にのみ許される
    #[error("content cannot be unset for role '{role}'")]
    ContentRequired { role: Role },
}

impl From<MessageError> for Error {
    fn from(e: MessageError) -> Self {
        Error::data_format(e.to_string())
    }
}

/// 会話の1ターン
///
/// content の「未設定」は system メッセージが与えられていない状態を表す。
/// 空文字の system とは区別する（モデルの挙動が異なるため）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: Role,
    content: Option<String>,
    token_count: usize,
}

impl Message {
    /// Message を構築する
    ///
    /// - content 未設定かつ role が system 以外: エラー
    /// - content 未設定かつ system: token_count は与えられた値に関わらず 0
    /// - token_count 指定あり: その値を信用して使う（API の usage 会計など）
    /// - token_count 指定なし: counter で数える
    pub fn new(
        role: Role,
        content: Option<String>,
        token_count: Option<usize>,
        counter: &dyn TokenCounter,
        model: &str,
    ) -> Result<Self, Error> {
        let content = match content {
            None if role != Role::System => {
                return Err(MessageError::ContentRequired { role }.into());
            }
            other => other,
        };
        let token_count = match (&content, token_count) {
            (None, _) => 0,
            (Some(_), Some(n)) => n,
            (Some(text), None) => counter.count_tokens(text, model)?,
        };
        Ok(Self {
            role,
            content,
            token_count,
        })
    }

    /// 未設定の system メッセージ（Context の初期 system スロット用）
    pub fn unset_system() -> Self {
        Self {
            role: Role::System,
            content: None,
            token_count: 0,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn is_content_set(&self) -> bool {
        self.content.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 単語数をトークン数とみなすスタブ
    struct WordCounter;

    impl TokenCounter for WordCounter {
        fn count_tokens(&self, text: &str, _model: &str) -> Result<usize, Error> {
            Ok(text.split_whitespace().count())
        }
    }

    #[test]
    fn test_unset_content_fails_for_user_and_assistant() {
        for role in [Role::User, Role::Assistant] {
            let result = Message::new(role, None, None, &WordCounter, "gpt-4o");
            let err = result.unwrap_err();
            assert_eq!(err.exit_code(), 65);
            assert!(err.to_string().contains(role.as_str()));
        }
    }

    #[test]
    fn test_unset_content_allowed_for_system_with_zero_tokens() {
        let msg = Message::new(Role::System, None, None, &WordCounter, "gpt-4o").unwrap();
        assert_eq!(msg.token_count(), 0);
        assert!(!msg.is_content_set());
        // token_count を渡しても未設定なら 0
        let msg = Message::new(Role::System, None, Some(42), &WordCounter, "gpt-4o").unwrap();
        assert_eq!(msg.token_count(), 0);
    }

    #[test]
    fn test_token_count_computed_from_counter() {
        let msg = Message::new(
            Role::User,
            Some("one two three".to_string()),
            None,
            &WordCounter,
            "gpt-4o",
        )
        .unwrap();
        assert_eq!(msg.token_count(), 3);
    }

    #[test]
    fn test_supplied_token_count_is_trusted() {
        let msg = Message::new(
            Role::Assistant,
            Some("one two three".to_string()),
            Some(99),
            &WordCounter,
            "gpt-4o",
        )
        .unwrap();
        assert_eq!(msg.token_count(), 99);
    }

    #[test]
    fn test_empty_string_is_set_content() {
        // 空文字と未設定は別物
        let msg = Message::new(
            Role::System,
            Some(String::new()),
            None,
            &WordCounter,
            "gpt-4o",
        )
        .unwrap();
        assert!(msg.is_content_set());
        assert_eq!(msg.token_count(), 0);
    }
}
