#![allow(clippy::module_inception)]

use std::fmt::Display;

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::errors::{Error, ErrorTip};

pub mod errors;
pub mod lexer;
pub mod macros;

extern crate regex;

pub use lexer::lexer::{Lexer, LexerOptions};
pub use lexer::state::{LexerState, SharedState};
pub use lexer::token_types::{Rule, TokenTypes};
pub use lexer::tokens::{Token, TokenKind};

lazy_static! {
    /// `\r\n`, `\r` and `\n` each count as a single line break.
    pub static ref LINE_BREAK: Regex = Regex::new(r"\r\n|\r|\n").expect("line break pattern is valid");
}

/// Half-open byte range `[start, end)` into the lexer source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A 1-based line/column pair. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The bounds of a token, each in line/column form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPosition {
    pub start: Position,
    pub end: Position,
}

/// Largest char boundary of `source` that is `<= offset`.
pub(crate) fn floor_char_boundary(source: &str, offset: usize) -> usize {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Maps a byte offset to its 1-based line and column.
pub fn position_in(source: &str, offset: usize) -> Position {
    let offset = floor_char_boundary(source, offset);
    let before = &source[..offset];

    let mut line = 1;
    let mut line_start = 0;
    for line_break in LINE_BREAK.find_iter(before) {
        line += 1;
        line_start = line_break.end();
    }

    Position {
        line,
        column: before[line_start..].chars().count() + 1,
    }
}

/// Returns the 1-based line number, the text of that line (without its line
/// break) and the 0-based character column of `offset` inside it.
pub fn get_line_at_position(source: &str, offset: usize) -> Option<(usize, String, usize)> {
    if offset > source.len() {
        return None;
    }

    let offset = floor_char_boundary(source, offset);
    let mut start = 0;
    let mut line_number = 1;

    for line_break in LINE_BREAK.find_iter(source) {
        // includes an offset sitting between `\r` and `\n`
        if offset < line_break.end() {
            break;
        }

        start = line_break.end();
        line_number += 1;
    }

    let end = LINE_BREAK
        .find_at(source, start)
        .map_or(source.len(), |line_break| line_break.start());

    let line = source[start..end].to_string();
    let line_pos = source[start..offset.min(end)].chars().count();
    Some((line_number, line, line_pos))
}


/// Renders an error against its source the way a compiler would:
///
/// ```text
/// Error: UnrecognizedInput (Unexpected input: `asdf`)
/// -> input.txt
///   |
/// 1 | 4 asdf 5
///   | --^
/// ```
pub fn format_error(error: &Error, source: &str, file: &str) -> String {
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!("Error: {} ({})\n", error.get_error_name(), error.get_tip()));
    }
    out.push_str(&format!("-> {}\n", file));

    let Some(offset) = error.get_offset() else {
        return out;
    };
    let Some((line, line_text, line_pos)) = get_line_at_position(source, offset) else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ').count();
    (String::from(&string[start..]), start)
}
