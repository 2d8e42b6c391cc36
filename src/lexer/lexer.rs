use std::{fmt::Debug, rc::Rc};

use tracing::{debug, trace};

use crate::{
    errors::errors::{Error, ErrorImpl},
    floor_char_boundary, position_in, Position, Span, TokenPosition,
};

use super::{
    state::{LexerState, SharedState},
    token_types::TokenTypes,
    tokens::Token,
};

/// Behaviours a lexer can be switched between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerOptions {
    /// Keep a trail of every consumed token, skipped ones included.
    pub record: bool,
    /// Fail `next`/`peek` on unrecognized input instead of returning an
    /// `Unrecognized` token.
    pub throw_on_unrecognized: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        LexerOptions {
            record: false,
            throw_on_unrecognized: true,
        }
    }
}

/// A lexer over a (possibly shared) scan state.
///
/// Scanning is on demand: `peek` looks at the next token without moving,
/// `next` consumes it. Several lexers with different rules can scan one
/// source cooperatively through `attach_to`.
#[derive(Debug)]
pub struct Lexer<K> {
    state: SharedState<K>,
    token_types: TokenTypes<K>,
    options: LexerOptions,
}

impl<K: Clone + PartialEq + Debug> Default for Lexer<K> {
    fn default() -> Self {
        Lexer::new(String::new())
    }
}

#[allow(clippy::should_implement_trait)]
impl<K: Clone + PartialEq + Debug> Lexer<K> {
    pub fn new(source: impl Into<String>) -> Self {
        Lexer::with_options(source, LexerOptions::default())
    }

    pub fn with_options(source: impl Into<String>, options: LexerOptions) -> Self {
        Lexer {
            state: LexerState::new(source).shared(),
            token_types: TokenTypes::new(),
            options,
        }
    }

    pub fn from_state(state: SharedState<K>) -> Self {
        Lexer {
            state,
            token_types: TokenTypes::new(),
            options: LexerOptions::default(),
        }
    }

    /// A lexer with no rules of its own, scanning `other`'s state.
    pub fn attached(other: &Lexer<K>) -> Self {
        Lexer::from_state(other.state())
    }

    /// Scan `other`'s state from now on. Consuming through either lexer
    /// moves both.
    pub fn attach_to(&mut self, other: &Lexer<K>) -> &mut Self {
        self.state = other.state();
        debug!(position = self.position(), "attached to shared state");
        self
    }

    pub fn state(&self) -> SharedState<K> {
        Rc::clone(&self.state)
    }

    pub fn is_attached_to(&self, other: &Lexer<K>) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut LexerOptions {
        &mut self.options
    }

    pub fn token_types(&self) -> &TokenTypes<K> {
        &self.token_types
    }

    pub fn token_types_mut(&mut self) -> &mut TokenTypes<K> {
        &mut self.token_types
    }

    pub fn define(&mut self, kind: K, pattern: &str) -> Result<&mut Self, Error> {
        self.token_types.define(kind, pattern)?;
        Ok(self)
    }

    pub fn define_skip(&mut self, kind: K, pattern: &str) -> Result<&mut Self, Error> {
        self.token_types.define_skip(kind, pattern)?;
        Ok(self)
    }

    pub fn define_literal(&mut self, kind: K, text: &str) -> Result<&mut Self, Error> {
        self.token_types.define_literal(kind, text)?;
        Ok(self)
    }

    pub fn define_keyword(&mut self, kind: K, word: &str) -> Result<&mut Self, Error> {
        self.token_types.define_keyword(kind, word)?;
        Ok(self)
    }

    pub fn define_operator(&mut self, kind: K, op: &str) -> Result<&mut Self, Error> {
        self.token_types.define_operator(kind, op)?;
        Ok(self)
    }

    pub fn enable(&mut self, kind: &K) -> Result<&mut Self, Error> {
        self.token_types.enable(kind, true)?;
        Ok(self)
    }

    pub fn disable(&mut self, kind: &K) -> Result<&mut Self, Error> {
        self.token_types.disable(kind)?;
        Ok(self)
    }

    pub fn is_enabled(&self, kind: &K) -> Result<bool, Error> {
        self.token_types.is_enabled(kind)
    }

    pub fn source(&self) -> Rc<str> {
        Rc::clone(self.state.borrow().source())
    }

    /// Replaces the source and starts over from offset 0, dropping pending
    /// inserted tokens and the trail.
    pub fn set_source(&mut self, source: impl Into<String>) -> &mut Self {
        self.state.borrow_mut().set_source(source);
        self
    }

    pub fn position(&self) -> usize {
        self.state.borrow().position()
    }

    pub fn set_position(&mut self, position: usize) -> &mut Self {
        self.state.borrow_mut().set_position(position);
        self
    }

    /// The source text not consumed yet.
    pub fn remaining(&self) -> String {
        self.state.borrow().remaining().to_string()
    }

    pub fn trail(&self) -> Vec<Token<K>> {
        self.state.borrow().trail().to_vec()
    }

    /// Looks at the next token without consuming anything.
    pub fn peek(&self) -> Result<Token<K>, Error> {
        self.peek_at(self.position())
    }

    /// Looks at the token at `position`. Pending inserted tokens still come
    /// first.
    pub fn peek_at(&self, position: usize) -> Result<Token<K>, Error> {
        let inserted = self.state.borrow().peek_inserted().cloned();
        if let Some(token) = inserted {
            return Ok(token);
        }

        let token = self.read(position);
        if token.is_unrecognized() && self.options.throw_on_unrecognized {
            return Err(self.unrecognized_error(&token));
        }

        Ok(token)
    }

    /// Consumes the next token.
    ///
    /// On unrecognized input the cursor still moves past the bad span
    /// before the error is returned, so calling `next` again resumes right
    /// after it.
    pub fn next(&mut self) -> Result<Token<K>, Error> {
        let inserted = self.state.borrow_mut().pop_inserted();
        if let Some(token) = inserted {
            trace!(kind = %token.kind, "next (inserted)");
            return Ok(token);
        }

        let token = self.read(self.position());
        self.consume(&token);

        if token.is_unrecognized() && self.options.throw_on_unrecognized {
            return Err(self.unrecognized_error(&token));
        }

        trace!(kind = %token.kind, start = token.span.start, end = token.span.end, "next");
        Ok(token)
    }

    /// Consumes the next token, failing if it is not of `kind`.
    pub fn expect(&mut self, kind: &K) -> Result<Token<K>, Error> {
        let token = self.next()?;

        if !token.is(kind) {
            let position = self.position_of(token.span.start);
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenType {
                    expected: format!("{:?}", kind),
                    received: token.kind.to_string(),
                    span: token.span,
                    line: position.line,
                    column: position.column,
                },
                Some(position),
            ));
        }

        Ok(token)
    }

    /// Restores the state to before `token` was consumed, elided input in
    /// front of it included. A transient token goes back on the pending
    /// stack.
    pub fn rewind(&mut self, token: &Token<K>) -> &mut Self {
        {
            let mut state = self.state.borrow_mut();
            if token.transient {
                state.push_inserted(token.clone());
            } else {
                state.set_position(token.full_start());
            }
        }

        debug!(kind = %token.kind, position = self.position(), "rewound");
        self
    }

    /// Queues a synthetic token ahead of the source. It consumes no input;
    /// the most recently inserted token is delivered first.
    pub fn insert(&mut self, mut token: Token<K>) -> &mut Self {
        token.transient = true;
        self.state.borrow_mut().push_inserted(token);
        self
    }

    /// 1-based line and column of a byte offset into the source.
    pub fn position_of(&self, offset: usize) -> Position {
        position_in(&self.source(), offset)
    }

    pub fn token_position(&self, token: &Token<K>) -> TokenPosition {
        TokenPosition {
            start: self.position_of(token.span.start),
            end: self.position_of(token.span.end),
        }
    }

    /// Every token of the source from the start, skipped and unrecognized
    /// ones as top-level entries, leaving the cursor, trail, pending
    /// tokens and unrecognized-input policy as they were.
    pub fn to_array(&mut self) -> Result<Vec<Token<K>>, Error> {
        let snapshot = self.state.borrow().clone();
        let should_throw = self.options.throw_on_unrecognized;
        self.options.throw_on_unrecognized = false;

        {
            let mut state = self.state.borrow_mut();
            state.clear_inserted();
            state.set_position(0);
        }

        let tokens = self.collect_tokens();

        *self.state.borrow_mut() = snapshot;
        self.options.throw_on_unrecognized = should_throw;
        tokens
    }

    fn collect_tokens(&mut self) -> Result<Vec<Token<K>>, Error> {
        let mut tokens = vec![];

        loop {
            let mut token = self.next()?;
            tokens.append(&mut token.skipped);

            if token.is_eof() {
                return Ok(tokens);
            }

            if token.is_empty() {
                return Err(Error::new(
                    ErrorImpl::ZeroLengthMatch {
                        kind: token.kind.to_string(),
                        offset: token.span.start,
                    },
                    Some(self.position_of(token.span.start)),
                ));
            }

            tokens.push(token);
        }
    }

    fn consume(&self, token: &Token<K>) {
        let mut state = self.state.borrow_mut();
        state.advance_to(token.span.end);

        if self.options.record {
            for skipped in &token.skipped {
                state.record(skipped.clone());
            }
            // an empty token leaves the cursor on its own start
            if !token.is_eof() && !token.is_empty() {
                state.record(token.clone());
            }
        }
    }

    /// Reads the token at `position`, folding skip-rule matches into its
    /// `skipped` list.
    fn read(&self, position: usize) -> Token<K> {
        let source = self.source();
        let mut position = floor_char_boundary(&source, position);
        let mut skipped = vec![];

        loop {
            let mut token = self.read_raw(&source, position);

            if token.skip {
                position = token.span.end;
                skipped.push(token);
                continue;
            }

            token.skipped = skipped;
            return token;
        }
    }

    /// One match at `position`, with no skip handling: EOF, a rule's token,
    /// or the unrecognized span up to where some rule matches again.
    fn read_raw(&self, source: &str, position: usize) -> Token<K> {
        if position >= source.len() {
            return Token::eof(source.len());
        }

        if let Some(token) = self.token_types.match_at(source, position) {
            return token;
        }

        let mut end = position;
        loop {
            end += source[end..].chars().next().map_or(1, char::len_utf8);

            if end >= source.len() || self.token_types.match_at(source, end).is_some() {
                break;
            }
        }

        debug!(start = position, end, "unrecognized input");
        Token::unrecognized(&source[position..end], position)
    }

    fn unrecognized_error(&self, token: &Token<K>) -> Error {
        let position = self.position_of(token.span.start);

        Error::new(
            ErrorImpl::UnrecognizedInput {
                text: token.value.clone(),
                span: token.span,
                elided: Span::new(token.full_start(), token.span.start),
                line: position.line,
                column: position.column,
            },
            Some(position),
        )
    }
}
