//! Integration tests for end-to-end scanning.
//!
//! These tests drive the public lexer API the way a parser built on top of
//! it would: switching rule sets mid-stream, recovering from bad input and
//! re-serializing token streams.

use perplex::{errors::errors::ErrorImpl, Lexer, LexerOptions, Token, TokenKind, MK_RULE};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
enum Kind {
    Number,
    Word,
    Whitespace,
    Quote,
    StringChars,
    Escape,
    Long,
    Short,
}

fn lexer(source: &str) -> Lexer<Kind> {
    let mut lexer = Lexer::new(source);
    lexer
        .define(Kind::Number, r"\d+")
        .unwrap()
        .define(Kind::Word, r"[a-z]+")
        .unwrap()
        .define_literal(Kind::Quote, "\"")
        .unwrap()
        .define_skip(Kind::Whitespace, r"\s+")
        .unwrap();
    lexer
}

/// Concatenates everything `next` hands out, elided input included.
fn reserialize(lexer: &mut Lexer<Kind>) -> String {
    let source = lexer.source();
    let mut text = String::new();

    loop {
        match lexer.next() {
            Ok(token) => {
                for skipped in &token.skipped {
                    text.push_str(&skipped.value);
                }
                if token.is_eof() {
                    return text;
                }
                text.push_str(&token.value);
            }
            Err(error) => match error.get_impl() {
                ErrorImpl::UnrecognizedInput { text: bad, elided, .. } => {
                    text.push_str(&source[elided.start..elided.end]);
                    text.push_str(bad);
                }
                other => panic!("unexpected error {:?}", other),
            },
        }
    }
}

#[test]
fn test_recovery_advances_position() {
    let mut lexer = lexer("4 asdf 5");
    lexer.disable(&Kind::Word).unwrap();

    assert_eq!(lexer.next().unwrap().value, "4");

    let error = lexer.next().unwrap_err();
    assert_eq!(error.get_error_name(), "UnrecognizedInput");
    assert!(error.to_string().contains("asdf"));

    assert_eq!(lexer.next().unwrap().value, "5");
    assert!(lexer.next().unwrap().is_eof());
}

#[test]
fn test_string_mode_through_attached_lexer() {
    let source = r#"say "hi \"there\"" done"#;
    let mut code = lexer(source);

    let mut strings = Lexer::attached(&code);
    strings
        .define(Kind::StringChars, r#"[^"\\]+"#)
        .unwrap()
        .define(Kind::Escape, r"\\.")
        .unwrap()
        .define_literal(Kind::Quote, "\"")
        .unwrap();

    assert_eq!(code.expect(&Kind::Word).unwrap().value, "say");
    code.expect(&Kind::Quote).unwrap();

    let mut contents = vec![];
    loop {
        let token = strings.next().unwrap();
        if token.is(&Kind::Quote) {
            break;
        }
        contents.push(token.value);
    }
    assert_eq!(contents, vec!["hi ", "\\\"", "there", "\\\""]);

    assert_eq!(code.peek().unwrap().value, "done");
    assert_eq!(strings.position(), code.position());
    assert_eq!(code.next().unwrap().value, "done");
    assert!(strings.next().unwrap().is_eof());
}

#[test]
fn test_enable_disable_across_next_calls() {
    let mut lexer: Lexer<Kind> = Lexer::new("  4 5 6  ");
    lexer
        .token_types_mut()
        .push(MK_RULE!(Kind::Whitespace, r"\s+").unwrap().enabled(false))
        .push(MK_RULE!(Kind::Number, r"\d+").unwrap())
        .push(MK_RULE!(Kind::Long, r"\s+", skip).unwrap());

    lexer.enable(&Kind::Whitespace).unwrap();
    assert!(lexer.next().unwrap().is(&Kind::Whitespace));
    assert_eq!(lexer.next().unwrap().value, "4");
    assert!(lexer.next().unwrap().is(&Kind::Whitespace));

    lexer.disable(&Kind::Whitespace).unwrap();
    let five = lexer.next().unwrap();
    assert_eq!(five.value, "5");
    assert!(five.skipped.is_empty());

    let six = lexer.next().unwrap();
    assert_eq!(six.value, "6");
    assert_eq!(six.skipped.len(), 1);
    assert!(six.skipped[0].is(&Kind::Long));
}

#[test]
fn test_expect_drives_a_parser() {
    let mut lexer = lexer("add 1 2");

    let op = lexer.expect(&Kind::Word).unwrap();
    let lhs = lexer.expect(&Kind::Number).unwrap();
    let rhs = lexer.expect(&Kind::Number).unwrap();

    assert_eq!((op.value.as_str(), lhs.value.as_str(), rhs.value.as_str()), ("add", "1", "2"));

    let error = lexer.expect(&Kind::Number).unwrap_err();
    assert_eq!(error.to_string(), "Expected Number, got EOF at 1:8");
}

#[test]
fn test_insert_synthesizes_tokens_for_a_parser() {
    let mut lexer = lexer("a b");

    let a = lexer.next().unwrap();
    lexer.insert(Token::transient(Kind::Quote, ""));
    assert!(lexer.next().unwrap().is(&Kind::Quote));
    lexer.rewind(&a);

    let tokens: Vec<_> = lexer.to_array().unwrap().into_iter().map(|token| token.value).collect();
    assert_eq!(tokens, vec!["a", " ", "b"]);
    assert_eq!(lexer.next().unwrap(), a);
}

#[test]
fn test_recording_trail_reproduces_source() {
    let source = "12 ab ?? \"x\" 9";
    let mut lexer = Lexer::with_options(
        source,
        LexerOptions {
            record: true,
            throw_on_unrecognized: true,
        },
    );
    lexer
        .define(Kind::Number, r"\d+")
        .unwrap()
        .define(Kind::Word, r"[a-z]+")
        .unwrap()
        .define_skip(Kind::Whitespace, r"\s+")
        .unwrap();

    while !lexer.peek().map(|token| token.is_eof()).unwrap_or(false) {
        let _ = lexer.next();
    }

    let trail: String = lexer.trail().iter().map(|token| token.value.as_str()).collect();
    assert_eq!(trail, source);
    assert!(lexer.trail().iter().any(|token| token.kind == TokenKind::Unrecognized));
}

proptest! {
    #[test]
    fn round_trip_collecting(source in "[a-z0-9 \t\n?é\"]{0,40}") {
        let mut lexer = lexer(&source);
        lexer.options_mut().throw_on_unrecognized = false;

        prop_assert_eq!(reserialize(&mut lexer), source);
    }

    #[test]
    fn round_trip_throwing(source in "[a-z0-9 \n?é]{0,40}") {
        let mut lexer = lexer(&source);
        lexer.disable(&Kind::Word).unwrap();

        prop_assert_eq!(reserialize(&mut lexer), source);
    }

    #[test]
    fn to_array_round_trip(source in "[a-z0-9 \r\n?]{0,40}") {
        let mut lexer = lexer(&source);

        let text: String = lexer.to_array().unwrap().iter().map(|token| token.value.as_str()).collect();
        prop_assert_eq!(text, source);
        prop_assert_eq!(lexer.position(), 0);
    }

    #[test]
    fn rewind_then_next_is_idempotent(source in "[a-z0-9 ?]{0,30}") {
        let mut lexer = lexer(&source);
        lexer.options_mut().throw_on_unrecognized = false;

        loop {
            let token = lexer.next().unwrap();
            lexer.rewind(&token);
            prop_assert_eq!(&lexer.next().unwrap(), &token);
            if token.is_eof() {
                break;
            }
        }
    }

    #[test]
    fn first_defined_rule_wins(source in "[a-z]{1,20}") {
        let mut lexer: Lexer<Kind> = Lexer::new(source.as_str());
        lexer
            .define(Kind::Short, r"[a-z]")
            .unwrap()
            .define(Kind::Long, r"[a-z]+")
            .unwrap();

        let token = lexer.next().unwrap();
        prop_assert!(token.is(&Kind::Short));
        prop_assert_eq!(token.len(), 1);
    }

    #[test]
    fn skip_tokens_never_surface(source in "[0-9 ]{0,30}") {
        let mut lexer = lexer(&source);

        loop {
            let token = lexer.next().unwrap();
            prop_assert!(!token.skip);
            prop_assert!(token.skipped.iter().all(|skipped| skipped.skip));
            if token.is_eof() {
                break;
            }
        }
    }

    #[test]
    fn attached_lexers_share_position(source in "[0-9 ]{0,30}") {
        let mut numbers = lexer(&source);
        let mut other = Lexer::attached(&numbers);
        other.define(Kind::Word, r"[a-z]+").unwrap();

        while !numbers.next().unwrap().is_eof() {
            prop_assert_eq!(other.position(), numbers.position());
        }
        prop_assert!(other.peek().unwrap().is_eof());
    }
}
