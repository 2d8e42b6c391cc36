use std::fmt::Display;

use thiserror::Error;

use crate::{Position, Span};

/// An error raised by the lexer, paired with the line/column it refers to
/// when it refers to one.
#[derive(Error, Debug, Clone)]
#[error("{internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Option<Position>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Option<Position>) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Byte offset the error points at, if any.
    pub fn get_offset(&self) -> Option<usize> {
        match &self.internal_error {
            ErrorImpl::UnrecognizedInput { span, .. } => Some(span.start),
            ErrorImpl::UnexpectedTokenType { span, .. } => Some(span.start),
            ErrorImpl::ZeroLengthMatch { offset, .. } => Some(*offset),
            ErrorImpl::UndefinedTokenType { .. } | ErrorImpl::InvalidPattern { .. } => None,
        }
    }

    /// Offset a caller can resume scanning from after an unrecognized span.
    pub fn resume_at(&self) -> Option<usize> {
        match &self.internal_error {
            ErrorImpl::UnrecognizedInput { span, .. } => Some(span.end),
            _ => None,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognizedInput { .. } => "UnrecognizedInput",
            ErrorImpl::UnexpectedTokenType { .. } => "UnexpectedTokenType",
            ErrorImpl::UndefinedTokenType { .. } => "UndefinedTokenType",
            ErrorImpl::InvalidPattern { .. } => "InvalidPattern",
            ErrorImpl::ZeroLengthMatch { .. } => "ZeroLengthMatch",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognizedInput { text, .. } => {
                ErrorTip::Suggestion(format!("Unexpected input: `{}`", text))
            }
            ErrorImpl::UnexpectedTokenType { expected, received, .. } => ErrorTip::Suggestion(
                format!("Expected token `{}`, received `{}`", expected, received),
            ),
            ErrorImpl::UndefinedTokenType { kind } => {
                ErrorTip::Suggestion(format!("Define `{}` before toggling it", kind))
            }
            ErrorImpl::InvalidPattern { .. } => ErrorTip::None,
            ErrorImpl::ZeroLengthMatch { kind, .. } => ErrorTip::Suggestion(format!(
                "`{}` matched empty input, make its pattern consume at least one character",
                kind
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    /// `elided` covers skip-rule input consumed right before the bad span.
    #[error("Unexpected input: {text} at ({line}:{column})")]
    UnrecognizedInput {
        text: String,
        span: Span,
        elided: Span,
        line: usize,
        column: usize,
    },
    #[error("Expected {expected}, got {received} at {line}:{column}")]
    UnexpectedTokenType {
        expected: String,
        received: String,
        span: Span,
        line: usize,
        column: usize,
    },
    #[error("Token of type {kind} does not exist")]
    UndefinedTokenType { kind: String },
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    #[error("token of type {kind} matched empty input at offset {offset}")]
    ZeroLengthMatch { kind: String, offset: usize },
}
