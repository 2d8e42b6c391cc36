use std::fmt::{Debug, Display};

use crate::Span;

/// What produced a token: a defined rule, or one of the two sentinels.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind<K> {
    Defined(K),
    EOF,
    Unrecognized,
}

impl<K> TokenKind<K> {
    pub fn defined(&self) -> Option<&K> {
        match self {
            TokenKind::Defined(kind) => Some(kind),
            _ => None,
        }
    }
}

impl<K: Debug> Display for TokenKind<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Defined(kind) => write!(f, "{:?}", kind),
            TokenKind::EOF => write!(f, "EOF"),
            TokenKind::Unrecognized => write!(f, "Unrecognized"),
        }
    }
}

/// A single lexed token.
///
/// Tokens own their data; nothing in the lexer holds on to a token after
/// handing it out, so callers are free to rewrite fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<K> {
    pub kind: TokenKind<K>,
    /// The text consumed to create this token.
    pub value: String,
    /// Capture groups of the match, the whole match first. Groups that did
    /// not participate are empty strings.
    pub groups: Vec<String>,
    pub span: Span,
    /// Produced by a skip rule.
    pub skip: bool,
    /// Skip-rule tokens elided right before this one.
    pub skipped: Vec<Token<K>>,
    /// Injected through `Lexer::insert`; consumes no input.
    pub transient: bool,
}

impl<K> Token<K> {
    pub fn new(kind: TokenKind<K>, value: String, groups: Vec<String>, start: usize, skip: bool) -> Self {
        let end = start + value.len();
        Token {
            kind,
            value,
            groups,
            span: Span { start, end },
            skip,
            skipped: vec![],
            transient: false,
        }
    }

    pub fn eof(position: usize) -> Self {
        Token {
            kind: TokenKind::EOF,
            value: String::new(),
            groups: vec![],
            span: Span { start: position, end: position },
            skip: false,
            skipped: vec![],
            transient: false,
        }
    }

    pub fn unrecognized(value: &str, start: usize) -> Self {
        Token::new(TokenKind::Unrecognized, value.to_string(), vec![value.to_string()], start, false)
    }

    /// A synthetic token for `Lexer::insert`.
    pub fn transient(kind: K, value: impl Into<String>) -> Self {
        let value = value.into();
        let mut token = Token::new(TokenKind::Defined(kind), value.clone(), vec![value], 0, false);
        token.span.end = 0;
        token.transient = true;
        token
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::EOF)
    }

    pub fn is_unrecognized(&self) -> bool {
        matches!(self.kind, TokenKind::Unrecognized)
    }

    pub fn is_transient(&self) -> bool {
        self.transient
    }

    /// Where this token's input begins, elided prefix included.
    pub fn full_start(&self) -> usize {
        self.skipped.first().map_or(self.span.start, |skipped| skipped.span.start)
    }
}

impl<K: PartialEq> Token<K> {
    pub fn is(&self, kind: &K) -> bool {
        self.kind.defined() == Some(kind)
    }

    pub fn is_one_of_many(&self, kinds: &[K]) -> bool {
        kinds.iter().any(|kind| self.is(kind))
    }
}

impl<K: Debug> Display for Token<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.value.is_empty() {
            write!(f, "{} ()", self.kind)
        } else {
            write!(f, "{} ({:?})", self.kind, self.value)
        }
    }
}
