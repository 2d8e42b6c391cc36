//! Error types and error handling for the lexer.
//!
//! This module defines the errors a lexer can raise:
//!
//! - Unrecognized input, carrying the offending span and where to resume
//! - Token type mismatches from `expect`
//! - References to token types that were never defined
//! - Patterns that fail to compile, and rules that stall on empty matches

pub mod errors;
