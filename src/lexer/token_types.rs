//! The ordered set of rules a lexer matches with.
//!
//! Rules are tried in the order they were defined and the first one that
//! matches wins, regardless of how long a later rule's match would be.
//! Grammars rely on that: define keywords before a generic identifier rule.

use std::fmt::Debug;

use regex::Regex;
use tracing::{debug, trace};

use crate::errors::errors::{Error, ErrorImpl};

use super::tokens::{Token, TokenKind};

/// A named pattern plus its enabled/skip flags.
#[derive(Debug, Clone)]
pub struct Rule<K> {
    kind: K,
    pattern: String,
    regex: Regex,
    enabled: bool,
    skip: bool,
    /// Reject a match followed by a word character.
    boundary: bool,
}

impl<K> Rule<K> {
    /// Compiles `pattern` anchored to the start of whatever it is run on.
    pub fn new(kind: K, pattern: &str) -> Result<Self, Error> {
        let regex = Regex::new(&format!("^(?:{})", pattern)).map_err(|source| {
            Error::new(
                ErrorImpl::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                },
                None,
            )
        })?;

        Ok(Rule {
            kind,
            pattern: pattern.to_string(),
            regex,
            enabled: true,
            skip: false,
            boundary: false,
        })
    }

    /// A rule matching `text` verbatim.
    pub fn literal(kind: K, text: &str) -> Result<Self, Error> {
        Rule::new(kind, &regex::escape(text))
    }

    /// A rule matching `word` only when it is not followed by another word
    /// character.
    pub fn keyword(kind: K, word: &str) -> Result<Self, Error> {
        let mut rule = Rule::new(kind, &regex::escape(word))?;
        rule.boundary = true;
        Ok(rule)
    }

    pub fn skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// The pattern as written, before anchoring.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_skip(&self) -> bool {
        self.skip
    }
}

#[derive(Debug, Clone)]
pub struct TokenTypes<K> {
    rules: Vec<Rule<K>>,
}

impl<K> Default for TokenTypes<K> {
    fn default() -> Self {
        TokenTypes { rules: vec![] }
    }
}

impl<K: Clone + PartialEq + Debug> TokenTypes<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Rule<K>) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn define(&mut self, kind: K, pattern: &str) -> Result<&mut Self, Error> {
        Ok(self.push(Rule::new(kind, pattern)?))
    }

    /// Defines a rule whose matches are elided from the token stream.
    pub fn define_skip(&mut self, kind: K, pattern: &str) -> Result<&mut Self, Error> {
        Ok(self.push(Rule::new(kind, pattern)?.skip(true)))
    }

    pub fn define_literal(&mut self, kind: K, text: &str) -> Result<&mut Self, Error> {
        Ok(self.push(Rule::literal(kind, text)?))
    }

    pub fn define_keyword(&mut self, kind: K, word: &str) -> Result<&mut Self, Error> {
        Ok(self.push(Rule::keyword(kind, word)?))
    }

    pub fn define_operator(&mut self, kind: K, op: &str) -> Result<&mut Self, Error> {
        self.define_literal(kind, op)
    }

    /// Toggles every rule of `kind`.
    pub fn enable(&mut self, kind: &K, enabled: bool) -> Result<&mut Self, Error> {
        let mut found = false;
        for rule in self.rules.iter_mut().filter(|rule| rule.kind == *kind) {
            rule.enabled = enabled;
            found = true;
        }

        if !found {
            return Err(undefined(kind));
        }

        debug!(kind = ?kind, enabled, "toggled token type");
        Ok(self)
    }

    pub fn disable(&mut self, kind: &K) -> Result<&mut Self, Error> {
        self.enable(kind, false)
    }

    /// Whether the first rule of `kind` is enabled.
    pub fn is_enabled(&self, kind: &K) -> Result<bool, Error> {
        self.rules
            .iter()
            .find(|rule| rule.kind == *kind)
            .map(|rule| rule.enabled)
            .ok_or_else(|| undefined(kind))
    }

    pub fn rules(&self) -> &[Rule<K>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Tries every enabled rule at `position` and builds a token from the
    /// first one that matches.
    ///
    /// A skip rule matching empty input does not count as a match; nothing
    /// would be consumed by eliding it. `position` must lie on a char
    /// boundary of `source`.
    pub fn match_at(&self, source: &str, position: usize) -> Option<Token<K>> {
        let remaining = source.get(position..)?;

        for rule in self.rules.iter().filter(|rule| rule.enabled) {
            let Some(captures) = rule.regex.captures(remaining) else {
                continue;
            };
            let Some(matched) = captures.get(0) else {
                continue;
            };

            if rule.skip && matched.is_empty() {
                continue;
            }

            let next_char = remaining[matched.end()..].chars().next();
            if rule.boundary && next_char.is_some_and(is_word_char) {
                continue;
            }

            let groups = captures
                .iter()
                .map(|group| group.map_or_else(String::new, |group| group.as_str().to_string()))
                .collect();

            trace!(kind = ?rule.kind, start = position, end = position + matched.len(), "matched");

            return Some(Token::new(
                TokenKind::Defined(rule.kind.clone()),
                matched.as_str().to_string(),
                groups,
                position,
                rule.skip,
            ));
        }

        None
    }
}

/// Same class as `\w` in a regex.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn undefined<K: Debug>(kind: &K) -> Error {
    Error::new(
        ErrorImpl::UndefinedTokenType {
            kind: format!("{:?}", kind),
        },
        None,
    )
}
