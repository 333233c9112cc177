//! Filter predicates deciding which handlers an update is routed to.
//!
//! A filter is a pure function of one payload; evaluation is total and never
//! fails. Malformed regular expressions are simply non-matches.

use regex::Regex;

use crate::types::{CallbackQuery, ChatKind, Message};

pub const DEFAULT_COMMAND_PREFIXES: &[char] = &['/'];

/// Closed set of matching rules.
///
/// A filter built for one payload side answers `false` on the other side
/// (`Has`/`Command` on callbacks, `CallbackData` on messages); only `All`,
/// `Chat` and `Regex` are meaningful on both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Matches every payload.
    All,
    /// The message carries a non-empty value for the named optional field,
    /// e.g. `"document"`, `"sticker"`, `"poll"`.
    Has(String),
    /// The chat the payload originates from has exactly this kind.
    Chat(ChatKind),
    /// The message text starts with one of `prefixes` and the remainder
    /// after stripping that one character matches `command` as a regex
    /// anchored at its start.
    ///
    /// The pattern is not anchored at the end: `Filter::command("start")`
    /// also matches `/startup`. Pass a terminated pattern (`"start$"`) for
    /// exact-command semantics.
    Command {
        command: String,
        prefixes: Vec<char>,
    },
    /// The message text contains an unanchored match for the pattern. On the
    /// callback side this is evaluated against the callback data string.
    Regex(String),
    /// The callback data string contains an unanchored match for the pattern.
    CallbackData(String),
}

impl Filter {
    /// Command filter with the default `/` prefix.
    pub fn command(command: impl Into<String>) -> Self {
        Self::command_with_prefixes(command, DEFAULT_COMMAND_PREFIXES)
    }

    pub fn command_with_prefixes(command: impl Into<String>, prefixes: &[char]) -> Self {
        Filter::Command {
            command: command.into(),
            prefixes: prefixes.to_vec(),
        }
    }

    pub fn has(field: impl Into<String>) -> Self {
        Filter::Has(field.into())
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Filter::Regex(pattern.into())
    }

    pub fn callback_data(pattern: impl Into<String>) -> Self {
        Filter::CallbackData(pattern.into())
    }

    /// Evaluate this filter against a message payload.
    pub fn check_message(&self, message: &Message) -> bool {
        match self {
            Filter::All => true,
            Filter::Has(field) => message.has_field(field),
            Filter::Chat(kind) => message.chat.kind == *kind,
            Filter::Command { command, prefixes } => match message.text.as_deref() {
                Some(text) => check_command(text, command, prefixes),
                None => false,
            },
            Filter::Regex(pattern) => match message.text.as_deref() {
                Some(text) => is_match(pattern, text),
                None => false,
            },
            Filter::CallbackData(_) => false,
        }
    }

    /// Evaluate this filter against a callback payload.
    pub fn check_callback(&self, query: &CallbackQuery) -> bool {
        match self {
            Filter::All => true,
            Filter::CallbackData(pattern) | Filter::Regex(pattern) => {
                match query.data.as_deref() {
                    Some(data) => is_match(pattern, data),
                    None => false,
                }
            }
            Filter::Chat(kind) => query
                .message
                .as_ref()
                .is_some_and(|message| message.chat.kind == *kind),
            Filter::Has(_) | Filter::Command { .. } => false,
        }
    }
}

/// Unanchored match; a pattern that does not compile never matches.
fn is_match(pattern: &str, text: &str) -> bool {
    match Regex::new(pattern) {
        Ok(re) => re.is_match(text),
        Err(_) => false,
    }
}

fn check_command(text: &str, command: &str, prefixes: &[char]) -> bool {
    let anchored = match Regex::new(&format!("^(?:{})", command)) {
        Ok(re) => re,
        Err(_) => return false,
    };
    for &prefix in prefixes {
        if let Some(rest) = text.strip_prefix(prefix) {
            if anchored.is_match(rest) {
                return true;
            }
        }
    }
    false
}
