//! transcript の永続化コーデック
//!
//! 保存形式は role タグ付きブロックの列。content は折り返しスカラー
//! （`>-`）として40桁で折り返し、4スペースでインデントする。
//! YAML ライブラリのフォーマットに任せず手書きで出力する（原文の
//! 改行位置を保った見た目を優先するため）。
//!
//! 読み込みは2形式に対応する:
//! - 構造化形式: role / content を持つレコード列（YAML）
//! - レガシー形式: `System:` / `User:` / `Assistant:` のラベル行で区切る
//!   行スキャン形式
//!
//! 形式は先頭の構造トークンで判別する（拡張子は見ない）。どちらの
//! 形式も全レコードを解析し終えてから Context に反映する（途中で
//! 失敗した場合に半端な Context を残さない）。

use crate::domain::context::Context;
use crate::domain::role::Role;
use common::error::Error;
use serde::Deserialize;
use thiserror::Error as ThisError;

/// content 折り返しの桁数
const WRAP_WIDTH: usize = 40;
/// content 行のインデント
const INDENT: &str = "    ";

/// transcript 解析のエラー
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum TranscriptError {
    /// 構造化形式に未知の role があった
    #[error("Unknown role '{role}' in transcript record {record}")]
    UnknownRole { role: String, record: usize },
    /// レガシー形式でラベル行より前に本文があった
    #[error("History file is improperly formatted: content before any role label at line {line}")]
    ContentBeforeLabel { line: usize },
    /// YAML としての解析に失敗した
    #[error("Failed to parse transcript: {0}")]
    Yaml(String),
}

impl From<TranscriptError> for Error {
    fn from(e: TranscriptError) -> Self {
        Error::data_format(e.to_string())
    }
}

/// Context を保存形式の文字列にする
///
/// system が設定されていれば先頭ブロックになる。未設定なら出力しない。
pub fn serialize(context: &Context) -> String {
    let mut out = String::new();
    if context.is_system_set() {
        write_block(
            &mut out,
            context.system().role(),
            context.system().content().unwrap_or_default(),
        );
    }
    for message in context.messages() {
        write_block(&mut out, message.role(), message.content().unwrap_or_default());
    }
    out
}

/// 保存形式の文字列を解析して Context に反映する
///
/// 全レコードの解析が成功した場合のみ反映する。反映は live セッションと
/// 同じ `add_message(content, role)` 経由なので、system role のレコードは
/// ファイルのどこにあってもスロット側に入る。
pub fn load_into(context: &mut Context, source: &str) -> Result<(), Error> {
    let records = parse(source)?;
    for (role, content) in records {
        context.add_message(&content, role)?;
    }
    Ok(())
}

/// 形式を判別して解析する
pub fn parse(source: &str) -> Result<Vec<(Role, String)>, TranscriptError> {
    let first_line = source
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .find(|l| !l.trim().is_empty());
    match first_line {
        Some(line) if Role::parse_label_line(line).is_some() => parse_legacy(source),
        Some(_) => parse_structured(source),
        None => Ok(Vec::new()),
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptRecord {
    role: String,
    content: String,
}

/// 構造化形式（role / content のレコード列）を解析する
fn parse_structured(source: &str) -> Result<Vec<(Role, String)>, TranscriptError> {
    let records: Vec<TranscriptRecord> =
        serde_yaml::from_str(source).map_err(|e| TranscriptError::Yaml(e.to_string()))?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| match Role::parse(&record.role) {
            Some(role) => Ok((role, record.content)),
            None => Err(TranscriptError::UnknownRole {
                role: record.role,
                record: index,
            }),
        })
        .collect()
}

/// レガシー形式（ラベル行区切り）を解析する
///
/// ラベル行で role を切り替え、次のラベル行か末尾まで本文を溜める。
/// 本文が溜まる前のラベル行は単なる role 切り替え。本文は前後の空白を
/// 落としてからレコードにする。
fn parse_legacy(source: &str) -> Result<Vec<(Role, String)>, TranscriptError> {
    let mut records: Vec<(Role, String)> = Vec::new();
    let mut role: Option<Role> = None;
    let mut content: Option<String> = None;

    for (index, raw_line) in source.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        if let Some(next_role) = Role::parse_label_line(line) {
            flush(&mut records, role, content.take());
            role = Some(next_role);
            content = Some(String::new());
        } else if let Some(buf) = content.as_mut() {
            buf.push_str(line);
            buf.push('\n');
        } else if line.trim().is_empty() {
            // 先頭の空行はスキップ
        } else {
            return Err(TranscriptError::ContentBeforeLabel { line: index + 1 });
        }
    }
    flush(&mut records, role, content);
    Ok(records)
}

fn flush(records: &mut Vec<(Role, String)>, role: Option<Role>, content: Option<String>) {
    if let (Some(role), Some(content)) = (role, content) {
        let trimmed = content.trim();
        if !trimmed.is_empty() {
            records.push((role, trimmed.to_string()));
        }
    }
}

fn write_block(out: &mut String, role: Role, content: &str) {
    out.push_str(&format!("- role: {role}\n"));
    out.push_str("  content: >-\n");
    for raw_line in content.split('\n') {
        if raw_line.trim().is_empty() {
            out.push('\n');
            continue;
        }
        for line in wrap_line(raw_line, WRAP_WIDTH) {
            out.push_str(INDENT);
            out.push_str(&line);
            out.push('\n');
        }
    }
}

/// 1行を指定桁で語単位に折り返す。桁より長い語は切らずにそのまま置く
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;
    for word in line.split_whitespace() {
        let word_width = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
