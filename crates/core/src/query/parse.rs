//! Recursive descent parser for query text
//!
//! Accepts the canonical rendering produced by `Display` as well as a
//! relaxed hand-written form.
//!
//! # Grammar
//!
//! ```text
//! query    := or_expr
//! or_expr  := and_expr ((OR | '|') and_expr)*
//! and_expr := unary ((AND | '&') unary)*
//! unary    := (NOT | '!') unary | primary
//! primary  := '(' or_expr ')' | QUOTED | WORD
//! ```
//!
//! Keywords are case-insensitive. A tag spelled like a keyword must be quoted.
//! Inside quotes, `\` escapes the next character.

use std::iter::Peekable;
use std::str::CharIndices;
use std::str::FromStr;

use super::Query;
use crate::error::QueryParseError;

type ParseResult<T> = std::result::Result<T, QueryParseError>;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Quoted(String),
    And,
    Or,
    Not,
    LeftParen,
    RightParen,
    Eof,
}

struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            len: input.len(),
        }
    }

    /// Next token and its starting byte offset
    fn next_token(&mut self) -> ParseResult<(usize, Token)> {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }

        let Some(&(pos, ch)) = self.chars.peek() else {
            return Ok((self.len, Token::Eof));
        };

        let token = match ch {
            '(' => {
                self.chars.next();
                Token::LeftParen
            }
            ')' => {
                self.chars.next();
                Token::RightParen
            }
            '!' => {
                self.chars.next();
                Token::Not
            }
            '&' => {
                self.chars.next();
                Token::And
            }
            '|' => {
                self.chars.next();
                Token::Or
            }
            '"' => {
                self.chars.next();
                Token::Quoted(self.read_quoted(pos)?)
            }
            c if is_word_char(c) => {
                let word = self.read_word();
                if word.eq_ignore_ascii_case("AND") {
                    Token::And
                } else if word.eq_ignore_ascii_case("OR") {
                    Token::Or
                } else if word.eq_ignore_ascii_case("NOT") {
                    Token::Not
                } else {
                    Token::Word(word)
                }
            }
            found => return Err(QueryParseError::UnexpectedChar { pos, found }),
        };
        Ok((pos, token))
    }

    fn read_quoted(&mut self, start: usize) -> ParseResult<String> {
        let mut out = String::new();
        loop {
            match self.chars.next() {
                None => return Err(QueryParseError::UnterminatedTag { pos: start }),
                Some((_, '"')) => break,
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, escaped)) => out.push(escaped),
                    None => return Err(QueryParseError::UnterminatedTag { pos: start }),
                },
                Some((_, c)) => out.push(c),
            }
        }
        if out.is_empty() {
            return Err(QueryParseError::EmptyTag { pos: start });
        }
        Ok(out)
    }

    fn read_word(&mut self) -> String {
        let mut out = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if !is_word_char(c) {
                break;
            }
            out.push(c);
            self.chars.next();
        }
        out
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':' | '.' | '-' | '/' | '@' | '#' | '+')
}

/// Parser for query text
pub struct QueryParser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    current_pos: usize,
}

impl<'a> QueryParser<'a> {
    /// Create a parser for the given text
    pub fn new(input: &'a str) -> ParseResult<Self> {
        let mut lexer = Lexer::new(input);
        let (current_pos, current) = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            current_pos,
        })
    }

    /// Parse the whole input into a query
    pub fn parse(mut self) -> ParseResult<Query> {
        let query = self.parse_or_expr()?;
        if self.current != Token::Eof {
            return Err(QueryParseError::TrailingInput {
                pos: self.current_pos,
            });
        }
        Ok(query)
    }

    fn advance(&mut self) -> ParseResult<()> {
        let (pos, token) = self.lexer.next_token()?;
        self.current = token;
        self.current_pos = pos;
        Ok(())
    }

    fn parse_or_expr(&mut self) -> ParseResult<Query> {
        let mut query = self.parse_and_expr()?;
        while self.current == Token::Or {
            self.advance()?;
            query = query.or(self.parse_and_expr()?);
        }
        Ok(query)
    }

    fn parse_and_expr(&mut self) -> ParseResult<Query> {
        let mut query = self.parse_unary()?;
        while self.current == Token::And {
            self.advance()?;
            query = query.and(self.parse_unary()?);
        }
        Ok(query)
    }

    fn parse_unary(&mut self) -> ParseResult<Query> {
        if self.current == Token::Not {
            self.advance()?;
            return Ok(self.parse_unary()?.negate());
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<Query> {
        match std::mem::replace(&mut self.current, Token::Eof) {
            Token::Word(name) | Token::Quoted(name) => {
                self.advance()?;
                Ok(Query::tag(name))
            }
            Token::LeftParen => {
                self.advance()?;
                let query = self.parse_or_expr()?;
                if self.current != Token::RightParen {
                    return Err(self.unexpected());
                }
                self.advance()?;
                Ok(query)
            }
            other => {
                self.current = other;
                Err(self.unexpected())
            }
        }
    }

    fn unexpected(&self) -> QueryParseError {
        match &self.current {
            Token::Eof => QueryParseError::UnexpectedEnd,
            Token::RightParen => QueryParseError::UnexpectedChar {
                pos: self.current_pos,
                found: ')',
            },
            Token::LeftParen => QueryParseError::UnexpectedChar {
                pos: self.current_pos,
                found: '(',
            },
            _ => QueryParseError::TrailingInput {
                pos: self.current_pos,
            },
        }
    }
}

impl FromStr for Query {
    type Err = QueryParseError;

    fn from_str(s: &str) -> ParseResult<Query> {
        QueryParser::new(s)?.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{and, not, or, tag};
    use proptest::prelude::*;

    fn parse(s: &str) -> ParseResult<Query> {
        s.parse()
    }

    #[test]
    fn test_parse_single_tag() {
        assert_eq!(parse("alpha").unwrap(), tag("alpha"));
        assert_eq!(parse("\"two words\"").unwrap(), tag("two words"));
        assert_eq!(parse("loc:12").unwrap(), tag("loc:12"));
    }

    #[test]
    fn test_parse_precedence() {
        // NOT binds tighter than AND, AND tighter than OR
        assert_eq!(
            parse("a OR b AND !c").unwrap(),
            or("a", and("b", not("c")))
        );
        assert_eq!(parse("NOT a and b").unwrap(), and(not("a"), "b"));
    }

    #[test]
    fn test_parse_left_associative() {
        assert_eq!(parse("a & b & c").unwrap(), and(and("a", "b"), "c"));
        assert_eq!(parse("a | b | c").unwrap(), or(or("a", "b"), "c"));
    }

    #[test]
    fn test_parse_parentheses() {
        assert_eq!(parse("a & (b | c)").unwrap(), and("a", or("b", "c")));
        assert_eq!(parse("!!a").unwrap(), not(not("a")));
    }

    #[test]
    fn test_parse_canonical_text() {
        let q = and("1", and(and(and("3", "2"), not("6")), not(and(not("3"), and("1", "6")))));
        assert_eq!(parse(q.as_str()).unwrap(), q);
    }

    #[test]
    fn test_parse_quoted_keyword_is_tag() {
        assert_eq!(parse("\"AND\"").unwrap(), tag("AND"));
    }

    #[test]
    fn test_parse_escapes() {
        assert_eq!(parse(r#""say \"hi\"""#).unwrap(), tag("say \"hi\""));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(""), Err(QueryParseError::UnexpectedEnd));
        assert_eq!(parse("a AND"), Err(QueryParseError::UnexpectedEnd));
        assert_eq!(parse("(a"), Err(QueryParseError::UnexpectedEnd));
        assert_eq!(parse("\"abc"), Err(QueryParseError::UnterminatedTag { pos: 0 }));
        assert_eq!(parse("a \"\""), Err(QueryParseError::EmptyTag { pos: 2 }));
        assert_eq!(parse("a b"), Err(QueryParseError::TrailingInput { pos: 2 }));
        assert_eq!(
            parse("a % b"),
            Err(QueryParseError::UnexpectedChar { pos: 2, found: '%' })
        );
        assert_eq!(
            parse("a)"),
            Err(QueryParseError::TrailingInput { pos: 1 })
        );
        assert_eq!(
            parse(")"),
            Err(QueryParseError::UnexpectedChar { pos: 0, found: ')' })
        );
    }

    fn arb_query() -> impl Strategy<Value = Query> {
        let leaf = "[a-z\"\\\\ ]{1,4}".prop_map(|name: String| Query::tag(name));
        leaf.prop_recursive(4, 24, 2, |inner| {
            prop_oneof![
                inner.clone().prop_map(Query::negate),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| a.and(b)),
                (inner.clone(), inner).prop_map(|(a, b)| a.or(b)),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_display_roundtrips(q in arb_query()) {
            let parsed: Query = q.as_str().parse().unwrap();
            prop_assert_eq!(parsed, q);
        }
    }
}
