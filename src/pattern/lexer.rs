// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/numeric-regex)

//! Tokenizer for numeric pattern strings.
//!
//! Produces one [`Token`] at a time on demand; the parser keeps a single
//! token of lookahead and never backtracks, so tokens are not buffered.

use std::fmt;

use crate::pattern::error::CompileError;

/// Classification of a lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Number with a decimal separator, e.g. `1.5` or `2,25`.
    Number,
    /// Number without a decimal separator, e.g. `42` or `-3`.
    Integer,
    /// Number followed by `%`, e.g. `10%` or `-2.5%`.
    Percent,
    /// Function name, `[A-Za-z][A-Za-z0-9_]*`.
    Function,
    /// `^`
    StartAnchor,
    /// `$`
    EndAnchor,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `[`
    OpenInterval,
    /// `]`
    CloseInterval,
    /// `{`
    OpenLimiter,
    /// `}`
    CloseLimiter,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `*`
    Asterisk,
    /// `+`
    Plus,
    /// `?`
    Question,
    /// `>`
    GreaterThan,
    /// `<`
    LessThan,
    /// `=`
    Equals,
    /// End of the pattern string.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Percent => "percentage",
            Self::Function => "function name",
            Self::StartAnchor => "'^'",
            Self::EndAnchor => "'$'",
            Self::OpenParen => "'('",
            Self::CloseParen => "')'",
            Self::OpenInterval => "'['",
            Self::CloseInterval => "']'",
            Self::OpenLimiter => "'{'",
            Self::CloseLimiter => "'}'",
            Self::Colon => "':'",
            Self::Semicolon => "';'",
            Self::Asterisk => "'*'",
            Self::Plus => "'+'",
            Self::Question => "'?'",
            Self::GreaterThan => "'>'",
            Self::LessThan => "'<'",
            Self::Equals => "'='",
            Self::Eof => "end of pattern",
        };
        f.write_str(s)
    }
}

/// A classified lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token classification.
    pub kind: TokenKind,
    /// Normalised text for value-bearing kinds (`Number`, `Integer`,
    /// `Percent`, `Function`); empty otherwise. Numbers use `.` as the
    /// decimal point and percentages omit the trailing `%`.
    pub lexeme: String,
    /// Byte offset of the first character of the token.
    pub offset: usize,
}

impl Token {
    const fn punct(kind: TokenKind, offset: usize) -> Self {
        Self {
            kind,
            lexeme: String::new(),
            offset,
        }
    }
}

/// Streaming tokenizer over a pattern string.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    /// Produces the next token, skipping whitespace.
    ///
    /// Returns a token of kind [`TokenKind::Eof`] at the end of input.
    ///
    /// # Errors
    ///
    /// Returns a lexical [`CompileError`] on an unrecognised character or a
    /// malformed number.
    pub fn next_token(&mut self) -> Result<Token, CompileError> {
        self.skip_whitespace();
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Ok(Token::punct(TokenKind::Eof, start));
        };

        if c.is_ascii_digit() || c == b'-' {
            return self.lex_number();
        }
        if c.is_ascii_alphabetic() {
            return Ok(self.lex_function());
        }

        let kind = match c {
            b'^' => TokenKind::StartAnchor,
            b'$' => TokenKind::EndAnchor,
            b'(' => TokenKind::OpenParen,
            b')' => TokenKind::CloseParen,
            b'[' => TokenKind::OpenInterval,
            b']' => TokenKind::CloseInterval,
            b'{' => TokenKind::OpenLimiter,
            b'}' => TokenKind::CloseLimiter,
            b':' => TokenKind::Colon,
            b';' => TokenKind::Semicolon,
            b'*' => TokenKind::Asterisk,
            b'+' => TokenKind::Plus,
            b'?' => TokenKind::Question,
            b'>' => TokenKind::GreaterThan,
            b'<' => TokenKind::LessThan,
            b'=' => TokenKind::Equals,
            _ => {
                return Err(CompileError::lexical(
                    format!("unexpected character '{}'", self.char_at(start)),
                    start,
                ))
            }
        };
        self.advance();
        Ok(Token::punct(kind, start))
    }

    fn lex_number(&mut self) -> Result<Token, CompileError> {
        let start = self.pos;
        let mut lexeme = String::new();
        if self.peek() == Some(b'-') {
            lexeme.push('-');
            self.advance();
        }

        let int_digits = self.take_digits(&mut lexeme);
        if int_digits == 0 {
            return Err(CompileError::lexical(
                "malformed number: expected digit",
                self.pos,
            ));
        }

        let mut is_decimal = false;
        if let Some(b'.' | b',') = self.peek() {
            is_decimal = true;
            lexeme.push('.');
            self.advance();
            if self.take_digits(&mut lexeme) == 0 {
                return Err(CompileError::lexical(
                    "malformed number: expected digit after decimal separator",
                    self.pos,
                ));
            }
            if let Some(b'.' | b',') = self.peek() {
                return Err(CompileError::lexical(
                    "malformed number: more than one decimal separator",
                    self.pos,
                ));
            }
        }

        let kind = if self.peek() == Some(b'%') {
            self.advance();
            TokenKind::Percent
        } else if is_decimal {
            TokenKind::Number
        } else {
            TokenKind::Integer
        };

        Ok(Token {
            kind,
            lexeme,
            offset: start,
        })
    }

    fn lex_function(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        // Only ASCII bytes were consumed, so the slice is valid UTF-8.
        let lexeme = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();
        Token {
            kind: TokenKind::Function,
            lexeme,
            offset: start,
        }
    }

    fn take_digits(&mut self, out: &mut String) -> usize {
        let mut n = 0;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                out.push(char::from(c));
                self.advance();
                n += 1;
            } else {
                break;
            }
        }
        n
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Full character at `offset`, for error messages on non-ASCII input.
    fn char_at(&self, offset: usize) -> char {
        std::str::from_utf8(&self.input[offset..])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token().unwrap();
            out.push(tok.kind);
            if tok.kind == TokenKind::Eof {
                return out;
            }
        }
    }

    fn single(input: &str) -> Token {
        Lexer::new(input).next_token().unwrap()
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("^()[]{}:;*+?><=$"),
            vec![
                TokenKind::StartAnchor,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
                TokenKind::OpenInterval,
                TokenKind::CloseInterval,
                TokenKind::OpenLimiter,
                TokenKind::CloseLimiter,
                TokenKind::Colon,
                TokenKind::Semicolon,
                TokenKind::Asterisk,
                TokenKind::Plus,
                TokenKind::Question,
                TokenKind::GreaterThan,
                TokenKind::LessThan,
                TokenKind::Equals,
                TokenKind::EndAnchor,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_integer() {
        let tok = single("42");
        assert_eq!(tok.kind, TokenKind::Integer);
        assert_eq!(tok.lexeme, "42");
        assert_eq!(tok.offset, 0);
    }

    #[test]
    fn test_negative_number() {
        let tok = single("-3.5");
        assert_eq!(tok.kind, TokenKind::Number);
        assert_eq!(tok.lexeme, "-3.5");
    }

    #[test]
    fn test_comma_is_decimal_point() {
        let tok = single("2,25");
        assert_eq!(tok.kind, TokenKind::Number);
        assert_eq!(tok.lexeme, "2.25");
    }

    #[test]
    fn test_percent() {
        let tok = single("10%");
        assert_eq!(tok.kind, TokenKind::Percent);
        assert_eq!(tok.lexeme, "10");

        let tok = single("-2.5%");
        assert_eq!(tok.kind, TokenKind::Percent);
        assert_eq!(tok.lexeme, "-2.5");
    }

    #[test]
    fn test_function_name() {
        let tok = single("mavg_asc2 3");
        assert_eq!(tok.kind, TokenKind::Function);
        assert_eq!(tok.lexeme, "mavg_asc2");
    }

    #[test]
    fn test_whitespace_skipped_and_offsets() {
        let mut lexer = Lexer::new("  5 \t 7");
        let a = lexer.next_token().unwrap();
        let b = lexer.next_token().unwrap();
        let eof = lexer.next_token().unwrap();
        assert_eq!((a.lexeme.as_str(), a.offset), ("5", 2));
        assert_eq!((b.lexeme.as_str(), b.offset), ("7", 6));
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.offset, 7);
    }

    #[test]
    fn test_two_decimal_separators_rejected() {
        let err = Lexer::new("1.2.3").next_token().unwrap_err();
        assert_eq!(err.kind, crate::pattern::error::CompileErrorKind::Lexical);
        assert!(err.message.contains("more than one decimal separator"));
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn test_missing_fraction_digits_rejected() {
        let err = Lexer::new("1.").next_token().unwrap_err();
        assert!(err.message.contains("after decimal separator"));
    }

    #[test]
    fn test_lone_minus_rejected() {
        let err = Lexer::new("- 5").next_token().unwrap_err();
        assert!(err.message.contains("expected digit"));
        assert_eq!(err.offset, 1);
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("5 #");
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.offset, 2);
        assert!(err.message.contains("'#'"));
    }

    #[test]
    fn test_non_ascii_character_reported_whole() {
        let err = Lexer::new("é").next_token().unwrap_err();
        assert!(err.message.contains("'é'"));
    }

    #[test]
    fn test_adjacent_tokens() {
        assert_eq!(
            kinds("[1:10%;asc]+"),
            vec![
                TokenKind::OpenInterval,
                TokenKind::Integer,
                TokenKind::Colon,
                TokenKind::Percent,
                TokenKind::Semicolon,
                TokenKind::Function,
                TokenKind::CloseInterval,
                TokenKind::Plus,
                TokenKind::Eof,
            ]
        );
    }
}
