//! Lexical analysis over a user-defined, ordered set of rules.
//!
//! This module contains the pieces a lexer is built from:
//!
//! - Tokens and the two sentinels, end of input and unrecognized input
//! - The rule registry, matched first-defined-first
//! - The scan state, shareable between several lexers
//! - The lexer itself: peek/next, skip elision, recovery, rewind, insert

pub mod lexer;
pub mod state;
pub mod token_types;
pub mod tokens;
