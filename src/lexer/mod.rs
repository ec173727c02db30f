pub mod errors;
mod matchers;

use matchers::*;

use std::fmt::Debug;
use std::ops::Range;
use std::str;

use miette::{bail, Result, SourceSpan};
use tracing::trace;

use crate::dbg_line;
use errors::LexerError;

#[derive(Debug, PartialEq, Clone)]
pub enum Token<'a> {
    Identifier(&'a str),

    Integer(&'a str),
    Float(&'a str),
    String(&'a str),
    Boolean(bool),
    Nil,

    // Brackets
    LeftBracket,  // [
    RightBracket, // ]

    // Separators
    Comma, // ,
    Star,  // * splat prefix
}

impl<'a> Token<'a> {
    pub fn eq_type(&self, other: &Token) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

#[derive(PartialEq)]
pub struct TokenSpan<'a> {
    pub token: Token<'a>,
    pub from: usize,
    pub to: usize,
}

impl From<&TokenSpan<'_>> for SourceSpan {
    fn from(span: &TokenSpan) -> Self {
        (span.from..span.to).into()
    }
}

impl<'a> TokenSpan<'a> {
    pub fn new(from: usize, to: usize, token: Token<'a>) -> Self {
        TokenSpan {
            from,
            // adding one because miette takes range instead of inclusive range
            to: to + 1,
            token,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.from..self.to
    }
}

impl Debug for TokenSpan<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.token.fmt(f)
    }
}

/// Byte oriented tokenizer for patterns and candidate literals.
///
/// The cursor rests on the last byte of a token while it is being built and
/// is advanced past it once the token is pushed.
pub struct Lexer<'a> {
    cursor: usize,
    code: &'a str,
    input: &'a [u8],
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str) -> Self {
        Lexer {
            cursor: 0,
            code,
            input: code.as_bytes(),
        }
    }

    pub fn at_end(&self) -> bool {
        self.cursor >= self.input.len()
    }

    pub fn current(&self) -> u8 {
        self.peek_next_n(0)
    }

    pub fn peek_next(&self) -> u8 {
        self.peek_next_n(1)
    }

    pub fn peek_next_n(&self, n: usize) -> u8 {
        if self.cursor + n >= self.input.len() {
            0
        } else {
            self.input[self.cursor + n]
        }
    }

    pub fn current_char(&self) -> char {
        self.code
            .get(self.cursor..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or('\0')
    }

    fn error<T>(&self, error: LexerError) -> Result<T> {
        Err(error.into_err_report())
    }

    pub fn skip_whitespace(&mut self) {
        while self.current().is_ascii_whitespace() {
            self.cursor += 1;
        }
    }

    pub fn read_slice_within(&mut self, range: Range<usize>) -> Result<&'a str> {
        let slice = &self.input[range];

        if let Ok(str) = str::from_utf8(slice) {
            Ok(str)
        } else {
            bail!("Failed to parse slice as UTF-8: {:?}", slice)
        }
    }

    pub fn read_str_that_matches(&mut self, match_fn: Matcher) -> Result<&'a str> {
        let from = self.cursor;
        self.skip_matches(match_fn);

        let slice = self.read_slice_within(from..self.cursor)?;
        if !slice.is_empty() {
            self.cursor -= 1;
        }
        Ok(slice)
    }

    pub fn skip_matches(&mut self, match_fn: Matcher) {
        let from = self.cursor;
        while !self.at_end() && match_fn(self.current(), &self.input[from..self.cursor]) {
            self.cursor += 1;
        }
    }

    pub fn lex(mut self) -> Result<Vec<TokenSpan<'a>>> {
        let mut tokens: Vec<TokenSpan<'a>> = Vec::new();

        loop {
            self.skip_whitespace();
            if self.at_end() {
                break;
            }
            let span_from = self.cursor;

            let token = match self.current() {
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                    let str = self.read_str_that_matches(IDENTIFIER_MATCHER)?;

                    match str {
                        "true" => Token::Boolean(true),
                        "false" => Token::Boolean(false),
                        "nil" => Token::Nil,
                        _ => Token::Identifier(str),
                    }
                }

                b'-' if self.peek_next().is_ascii_digit() => self.lex_number()?,
                b'0'..=b'9' => self.lex_number()?,

                quote @ (b'"' | b'\'') => self.lex_string(quote)?,

                b'[' => Token::LeftBracket,
                b']' => Token::RightBracket,
                b',' => Token::Comma,
                b'*' => Token::Star,

                _ => return self.error(LexerError::UnexpectedCharacter(errors::UnexpectedCharacter {
                    dbg_line: dbg_line!(),
                    actual: self.current_char(),
                    src: self.code.to_string(),
                    position: (self.cursor, self.current_char().len_utf8()).into(),
                })),
            };

            tokens.push(TokenSpan::new(span_from, self.cursor, token));

            self.cursor += 1;
        }

        trace!(count = tokens.len(), "lexed {:?}", self.code);
        Ok(tokens)
    }

    fn lex_number(&mut self) -> Result<Token<'a>> {
        let start = self.cursor;
        if self.current() == b'-' {
            self.cursor += 1;
        }

        self.skip_matches(NUMBER_MATCHER);

        let token = if self.current() == b'.' && self.peek_next().is_ascii_digit() {
            self.cursor += 2;
            self.skip_matches(NUMBER_MATCHER);
            Token::Float(self.read_slice_within(start..self.cursor)?)
        } else {
            Token::Integer(self.read_slice_within(start..self.cursor)?)
        };

        if matches!(self.current(), b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'.') {
            return self.error(LexerError::MalformedNumber(errors::MalformedNumber {
                dbg_line: dbg_line!(),
                number: self.code[start..self.cursor].to_string(),
                next: self.current_char(),
                src: self.code.to_string(),
                position: (start..self.cursor + 1).into(),
            }))
        }

        self.cursor -= 1;
        Ok(token)
    }

    fn lex_string(&mut self, quote: u8) -> Result<Token<'a>> {
        let start = self.cursor;
        self.cursor += 1;

        let from = self.cursor;
        self.skip_matches(match quote {
            b'"' => NOT_DOUBLE_QUOTE_MATCHER,
            _ => NOT_SINGLE_QUOTE_MATCHER,
        });

        if self.at_end() {
            return self.error(LexerError::UnterminatedString(errors::UnterminatedString {
                dbg_line: dbg_line!(),
                quote: char::from(quote),
                src: self.code.to_string(),
                position: (start..self.input.len()).into(),
            }))
        }

        // cursor stays on the closing quote
        Ok(Token::String(self.read_slice_within(from..self.cursor)?))
    }
}
