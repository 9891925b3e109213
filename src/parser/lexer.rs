//! Tokenizer for record literals.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_until, take_while, take_while1};
use nom::character::complete::{char, digit1, multispace1};
use nom::combinator::{map, opt, recognize, value};
use nom::error::ErrorKind;
use nom::multi::many0;
use nom::sequence::pair;
use nom::{IResult, Parser};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    Ident(&'a str),
    Number(&'a str),
    Str(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected input at byte {offset}")]
pub struct LexError {
    pub offset: usize,
}

pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, LexError> {
    let mut tokens = Vec::new();
    let mut rest = input;

    loop {
        let (after, ()) = trivia(rest).map_err(|_| LexError {
            offset: input.len() - rest.len(),
        })?;
        if after.is_empty() {
            return Ok(tokens);
        }

        let (next, token) = token(after).map_err(|_| LexError {
            offset: input.len() - after.len(),
        })?;
        tokens.push(token);
        rest = next;
    }
}

/// Reads a quoted string starting at the opening quote (`'`, `"` or a
/// backtick) and returns the unescaped value with the number of bytes
/// consumed, closing quote included. `None` when the string never closes.
#[must_use]
pub fn scan_quoted(input: &str) -> Option<(String, usize)> {
    let mut chars = input.char_indices();
    let (_, quote) = chars.next().filter(|&(_, c)| matches!(c, '\'' | '"' | '`'))?;

    let mut out = String::new();
    while let Some((index, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, escaped) = chars.next()?;
                match escaped {
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    '0' => out.push('\0'),
                    'u' => {
                        let hex: String = chars.by_ref().take(4).map(|(_, h)| h).collect();
                        let code = u32::from_str_radix(&hex, 16).ok()?;
                        out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                    }
                    // Line continuation.
                    '\n' => {}
                    other => out.push(other),
                }
            }
            c if c == quote => return Some((out, index + c.len_utf8())),
            c => out.push(c),
        }
    }

    None
}

fn trivia(input: &str) -> IResult<&str, ()> {
    value((), many0(alt((multispace1, line_comment, block_comment)))).parse(input)
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("//"), take_while(|c: char| c != '\n'))).parse(input)
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize((tag("/*"), take_until("*/"), tag("*/"))).parse(input)
}

fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        value(Token::LBrace, char('{')),
        value(Token::RBrace, char('}')),
        value(Token::LBracket, char('[')),
        value(Token::RBracket, char(']')),
        value(Token::Colon, char(':')),
        value(Token::Comma, char(',')),
        string_literal,
        map(number, Token::Number),
        map(identifier, Token::Ident),
    ))
    .parse(input)
}

fn string_literal(input: &str) -> IResult<&str, Token<'_>> {
    match scan_quoted(input) {
        Some((text, consumed)) => Ok((&input[consumed..], Token::Str(text))),
        None => Err(nom::Err::Error(nom::error::Error::new(input, ErrorKind::Char))),
    }
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize((opt(char('-')), digit1, opt(pair(char('.'), digit1)))).parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_' || c == '$'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$'),
    ))
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_record() {
        let tokens = tokenize("{ id: 'ep-1', featured: true, order: -2.5, }").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::LBrace,
                Token::Ident("id"),
                Token::Colon,
                Token::Str("ep-1".to_string()),
                Token::Comma,
                Token::Ident("featured"),
                Token::Colon,
                Token::Ident("true"),
                Token::Comma,
                Token::Ident("order"),
                Token::Colon,
                Token::Number("-2.5"),
                Token::Comma,
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokenize("{\n  // editor note\n  /* block */ id: \"x\"\n}").unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[1], Token::Ident("id"));
    }

    #[test]
    fn test_scan_quoted_escapes() {
        let (text, consumed) = scan_quoted(r"'It\'s a \\path\\ with\na\tbreak' trailing").unwrap();
        assert_eq!(text, "It's a \\path\\ with\na\tbreak");
        assert_eq!(consumed, 33);
    }

    #[test]
    fn test_scan_quoted_stops_at_first_unescaped_quote() {
        let (text, _) = scan_quoted(r#""say \"hi\"" and "more""#).unwrap();
        assert_eq!(text, "say \"hi\"");
    }

    #[test]
    fn test_scan_quoted_unicode_escape() {
        let (text, _) = scan_quoted(r"'caf\u00e9'").unwrap();
        assert_eq!(text, "café");
    }

    #[test]
    fn test_scan_quoted_unterminated() {
        assert_eq!(scan_quoted("'never closes"), None);
        assert_eq!(scan_quoted("no quote"), None);
    }

    #[test]
    fn test_tokenize_rejects_expressions() {
        let err = tokenize("{ category: Category.Energy }").unwrap_err();
        assert_eq!(err.offset, 20);
    }
}
