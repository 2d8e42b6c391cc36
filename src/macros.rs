//! Utility macros for the lexer.
//!
//! - `MK_TOKEN!` - Creates a Token produced by a defined rule
//! - `MK_RULE!` - Creates a Rule, optionally marked as a skip rule
//!
//! These macros reduce boilerplate when building rule sets and when
//! spelling out expected tokens.

/// Creates a Token for a defined kind, deriving its end from the value.
///
/// # Arguments
///
/// * `$kind` - The caller's token kind
/// * `$value` - The matched text
/// * `$start` - The byte offset the match starts at
/// * `$groups` - Optional capture groups; defaults to just the whole match
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(Kind::Number, "42", 0);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $start:expr) => {{
        let value: String = String::from($value);
        $crate::lexer::tokens::Token::new(
            $crate::lexer::tokens::TokenKind::Defined($kind),
            value.clone(),
            vec![value],
            $start,
            false,
        )
    }};
    ($kind:expr, $value:expr, $start:expr, [$($group:expr),* $(,)?]) => {
        $crate::lexer::tokens::Token::new(
            $crate::lexer::tokens::TokenKind::Defined($kind),
            String::from($value),
            vec![$(String::from($group)),*],
            $start,
            false,
        )
    };
}

/// Creates a Rule from a kind and a regex pattern.
///
/// Evaluates to `Result<Rule<K>, Error>`; pass `skip` as a third argument
/// to build a skip rule.
///
/// # Example
///
/// ```ignore
/// lexer.token_types_mut().push(MK_RULE!(Kind::Whitespace, r"\s+", skip)?);
/// ```
#[macro_export]
macro_rules! MK_RULE {
    ($kind:expr, $pattern:expr) => {
        $crate::lexer::token_types::Rule::new($kind, $pattern)
    };
    ($kind:expr, $pattern:expr, skip) => {
        $crate::lexer::token_types::Rule::new($kind, $pattern).map(|rule| rule.skip(true))
    };
}
