//! The scan position several lexers can share.

use std::{cell::RefCell, rc::Rc};

use tracing::debug;

use crate::floor_char_boundary;

use super::tokens::Token;

/// Handle through which attached lexers share one state.
pub type SharedState<K> = Rc<RefCell<LexerState<K>>>;

#[derive(Debug, Clone)]
pub struct LexerState<K> {
    source: Rc<str>,
    position: usize,
    /// Tokens consumed strictly before `position`, when recording.
    trail: Vec<Token<K>>,
    /// Tokens handed out ahead of the source, last inserted first.
    inserted: Vec<Token<K>>,
}

impl<K> LexerState<K> {
    pub fn new(source: impl Into<String>) -> Self {
        LexerState {
            source: Rc::from(source.into()),
            position: 0,
            trail: vec![],
            inserted: vec![],
        }
    }

    pub fn shared(self) -> SharedState<K> {
        Rc::new(RefCell::new(self))
    }

    pub fn source(&self) -> &Rc<str> {
        &self.source
    }

    /// Replaces the source, starting over from offset 0.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = Rc::from(source.into());
        self.position = 0;
        self.trail.clear();
        self.clear_inserted();
        debug!(len = self.source.len(), "source replaced");
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor, clamped into the source and onto a char boundary.
    /// Recorded tokens starting at or after the new position are dropped.
    pub fn set_position(&mut self, position: usize) {
        self.position = floor_char_boundary(&self.source, position);
        let position = self.position;
        self.trail.retain(|token| token.span.start < position);
    }

    /// Moves forward after consuming a token; no trail pruning.
    pub(crate) fn advance_to(&mut self, position: usize) {
        self.position = position;
    }

    pub fn remaining(&self) -> &str {
        &self.source[self.position..]
    }

    pub fn at_eof(&self) -> bool {
        self.position >= self.source.len()
    }

    pub fn trail(&self) -> &[Token<K>] {
        &self.trail
    }

    pub(crate) fn record(&mut self, token: Token<K>) {
        self.trail.push(token);
    }

    pub(crate) fn push_inserted(&mut self, token: Token<K>) {
        self.inserted.push(token);
    }

    pub(crate) fn pop_inserted(&mut self) -> Option<Token<K>> {
        self.inserted.pop()
    }

    pub(crate) fn peek_inserted(&self) -> Option<&Token<K>> {
        self.inserted.last()
    }

    pub(crate) fn clear_inserted(&mut self) {
        self.inserted.clear();
    }
}

impl<K> Default for LexerState<K> {
    fn default() -> Self {
        LexerState::new(String::new())
    }
}
