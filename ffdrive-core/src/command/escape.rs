//! Quoting rules for embedding arguments in an assembled command line.
//!
//! The command line is a single string, split back into arguments with
//! POSIX-shell word rules before ffmpeg is spawned. Inside a double-quoted
//! argument only `"` and `\` need escaping for that split to be lossless.

use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// The quoting character of the assembled command line.
pub const QUOTE: char = '"';

/// Escapes `\` and `"` so the text can sit inside a double-quoted argument.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    for ch in text.chars() {
        if ch == '\\' || ch == QUOTE {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Wraps escaped text in double quotes.
#[must_use]
pub fn quote(text: &str) -> String {
    format!("{QUOTE}{}{QUOTE}", escape(text))
}

/// Quotes a path, converting it lossily to UTF-8 first.
#[must_use]
pub fn quote_path(path: &Path) -> String {
    quote(&path.to_string_lossy())
}

/// Emits a single-word value as-is and quotes anything that would not
/// survive word splitting on its own.
#[must_use]
pub fn token(text: &str) -> String {
    let needs_quoting = text.is_empty()
        || text
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\'));
    if needs_quoting {
        quote(text)
    } else {
        text.to_string()
    }
}

/// Splits an assembled command line back into its arguments.
pub fn split(command_line: &str) -> CoreResult<Vec<String>> {
    shell_words::split(command_line).map_err(|e| CoreError::CommandParse(e.to_string()))
}
