use std::{iter::Peekable, str::CharIndices};

use tracing::trace;

use crate::token::{Token, TokenKind};

mod error;

pub use error::{LexError, LexResult};

const TWO_CHAR_OPERATORS: [&str; 6] = ["&&", "||", "==", "!=", "<=", ">="];

pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Lexes the next token, or `None` once only whitespace remains.
    pub fn next_token(&mut self) -> LexResult<Option<Token<'a>>> {
        self.skip_whitespace();

        let Some(&(start, ch)) = self.chars.peek() else {
            return Ok(None);
        };

        let token = match ch {
            c if c.is_ascii_alphabetic() || c == '_' => self.read_identifier(start),
            c if c.is_ascii_digit() => self.read_number(start)?,
            '+' | '-' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number(start)?
            }
            '\'' => self.read_character(start)?,
            '"' => self.read_string(start)?,
            c if !c.is_alphanumeric() && !c.is_whitespace() => self.read_operator(start),
            c => {
                return Err(LexError::UnexpectedCharacter {
                    character: c,
                    offset: start,
                });
            }
        };
        Ok(Some(token))
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{8}') {
                self.chars.next();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self, start: usize) -> Token<'a> {
        self.chars.next(); // Consume first char
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                self.chars.next();
            } else {
                break;
            }
        }
        self.emit(TokenKind::Identifier, start)
    }

    fn read_number(&mut self, start: usize) -> LexResult<Token<'a>> {
        if matches!(self.peek_char(), Some('+' | '-')) {
            self.chars.next();
        }

        let digits_start = self.current_index();
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.chars.next();
        }
        let digits = &self.input[digits_start..self.current_index()];
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(LexError::InvalidNumber {
                literal: self.input[start..self.current_index()].to_string(),
                reason: "leading zeros are not allowed",
                offset: start,
            });
        }

        if self.peek_char() != Some('.') {
            return Ok(self.emit(TokenKind::Integer, start));
        }
        if !self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            return Err(LexError::InvalidNumber {
                literal: self.input[start..=self.current_index()].to_string(),
                reason: "expected a digit after the decimal point",
                offset: self.current_index(),
            });
        }
        self.chars.next(); // Consume '.'
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.chars.next();
        }
        Ok(self.emit(TokenKind::Decimal, start))
    }

    fn read_character(&mut self, start: usize) -> LexResult<Token<'a>> {
        self.chars.next(); // Consume opening quote
        match self.chars.next() {
            None | Some((_, '\n' | '\r')) => {
                return Err(LexError::UnterminatedCharacter { offset: start });
            }
            Some((_, '\'')) => return Err(LexError::InvalidCharacter { offset: start }),
            Some((index, '\\')) => self.read_escape(index)?,
            Some(_) => {}
        }
        match self.chars.next() {
            Some((_, '\'')) => Ok(self.emit(TokenKind::Character, start)),
            None => Err(LexError::UnterminatedCharacter { offset: start }),
            Some(_) => Err(LexError::InvalidCharacter { offset: start }),
        }
    }

    fn read_string(&mut self, start: usize) -> LexResult<Token<'a>> {
        self.chars.next(); // Consume opening quote
        loop {
            match self.chars.next() {
                None | Some((_, '\n' | '\r')) => {
                    return Err(LexError::UnterminatedString { offset: start });
                }
                Some((_, '"')) => return Ok(self.emit(TokenKind::String, start)),
                Some((index, '\\')) => self.read_escape(index)?,
                Some(_) => {}
            }
        }
    }

    /// Validates the character after a backslash at `backslash`.
    fn read_escape(&mut self, backslash: usize) -> LexResult<()> {
        match self.chars.next() {
            Some((_, 'b' | 'n' | 'r' | 't' | '\'' | '"' | '\\')) => Ok(()),
            _ => Err(LexError::InvalidEscape { offset: backslash }),
        }
    }

    fn read_operator(&mut self, start: usize) -> Token<'a> {
        let rest = &self.input[start..];
        if TWO_CHAR_OPERATORS.iter().any(|op| rest.starts_with(op)) {
            self.chars.next();
        }
        self.chars.next();
        self.emit(TokenKind::Operator, start)
    }

    fn emit(&mut self, kind: TokenKind, start: usize) -> Token<'a> {
        let end = self.current_index();
        Token::new(kind, &self.input[start..end], start)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_second(&self) -> Option<char> {
        self.chars.clone().nth(1).map(|(_, c)| c)
    }

    fn current_index(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = LexResult<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

pub fn tokenize(input: &str) -> LexResult<Vec<Token<'_>>> {
    let tokens = Lexer::new(input).collect::<LexResult<Vec<_>>>()?;
    trace!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}

/// Decodes the escapes in the body of a character or string literal (the
/// text between the quotes). The lexer has already rejected unknown escapes.
pub fn unescape(body: &str) -> String {
    let mut output = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            output.push(c);
            continue;
        }
        match chars.next() {
            Some('b') => output.push('\u{8}'),
            Some('n') => output.push('\n'),
            Some('r') => output.push('\r'),
            Some('t') => output.push('\t'),
            Some(other) => output.push(other),
            None => output.push('\\'),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn kinds_and_texts(input: &str) -> Vec<(TokenKind, &str)> {
        tokenize(input)
            .expect("tokenize should succeed")
            .into_iter()
            .map(|token| (token.kind, token.text))
            .collect()
    }

    #[test]
    fn test_simple_program() {
        let input = indoc! {"
            DEF main(): Integer DO
                print(\"Hello\");
                RETURN 0;
            END
        "};
        let expected = vec![
            (TokenKind::Identifier, "DEF"),
            (TokenKind::Identifier, "main"),
            (TokenKind::Operator, "("),
            (TokenKind::Operator, ")"),
            (TokenKind::Operator, ":"),
            (TokenKind::Identifier, "Integer"),
            (TokenKind::Identifier, "DO"),
            (TokenKind::Identifier, "print"),
            (TokenKind::Operator, "("),
            (TokenKind::String, "\"Hello\""),
            (TokenKind::Operator, ")"),
            (TokenKind::Operator, ";"),
            (TokenKind::Identifier, "RETURN"),
            (TokenKind::Integer, "0"),
            (TokenKind::Operator, ";"),
            (TokenKind::Identifier, "END"),
        ];
        assert_eq!(kinds_and_texts(input), expected);
    }

    #[test]
    fn identifiers_may_contain_hyphens() {
        assert_eq!(
            kinds_and_texts("getName _x a-b-c"),
            vec![
                (TokenKind::Identifier, "getName"),
                (TokenKind::Identifier, "_x"),
                (TokenKind::Identifier, "a-b-c"),
            ]
        );
    }

    #[test]
    fn lexes_signed_numbers_and_decimals() {
        assert_eq!(
            kinds_and_texts("0 -1 +25 3.14 -0.5"),
            vec![
                (TokenKind::Integer, "0"),
                (TokenKind::Integer, "-1"),
                (TokenKind::Integer, "+25"),
                (TokenKind::Decimal, "3.14"),
                (TokenKind::Decimal, "-0.5"),
            ]
        );
    }

    #[test]
    fn sign_without_digit_is_an_operator() {
        assert_eq!(
            kinds_and_texts("x - y"),
            vec![
                (TokenKind::Identifier, "x"),
                (TokenKind::Operator, "-"),
                (TokenKind::Identifier, "y"),
            ]
        );
    }

    #[test]
    fn errors_on_leading_zero() {
        let err = tokenize("007").expect_err("expected leading zero failure");
        assert!(matches!(err, LexError::InvalidNumber { offset: 0, .. }));
    }

    #[test]
    fn errors_on_trailing_decimal_point() {
        let err = tokenize("x = 1.;").expect_err("expected trailing point failure");
        assert!(matches!(err, LexError::InvalidNumber { offset: 5, .. }));
    }

    #[test]
    fn lexes_character_literals_and_escapes() {
        assert_eq!(
            kinds_and_texts(r"'c' '\n' '\''"),
            vec![
                (TokenKind::Character, "'c'"),
                (TokenKind::Character, r"'\n'"),
                (TokenKind::Character, r"'\''"),
            ]
        );
    }

    #[test]
    fn errors_on_malformed_characters() {
        assert_eq!(
            tokenize("''").expect_err("empty"),
            LexError::InvalidCharacter { offset: 0 }
        );
        assert_eq!(
            tokenize("'ab'").expect_err("too long"),
            LexError::InvalidCharacter { offset: 0 }
        );
        assert_eq!(
            tokenize("'a").expect_err("unterminated"),
            LexError::UnterminatedCharacter { offset: 0 }
        );
        assert_eq!(
            tokenize(r"'\q'").expect_err("bad escape"),
            LexError::InvalidEscape { offset: 1 }
        );
    }

    #[test]
    fn lexes_strings_with_escapes() {
        assert_eq!(
            kinds_and_texts(r#""" "Hello, World!" "a\tb\"c""#),
            vec![
                (TokenKind::String, r#""""#),
                (TokenKind::String, r#""Hello, World!""#),
                (TokenKind::String, r#""a\tb\"c""#),
            ]
        );
    }

    #[test]
    fn errors_on_unterminated_strings() {
        assert_eq!(
            tokenize("\"abc").expect_err("eof"),
            LexError::UnterminatedString { offset: 0 }
        );
        assert_eq!(
            tokenize("x \"ab\ncd\"").expect_err("newline"),
            LexError::UnterminatedString { offset: 2 }
        );
        assert_eq!(
            tokenize(r#""a\zb""#).expect_err("bad escape"),
            LexError::InvalidEscape { offset: 2 }
        );
    }

    #[test]
    fn two_char_operators_take_priority() {
        assert_eq!(
            kinds_and_texts("a<=b && c!=d || !e ==f >= <"),
            vec![
                (TokenKind::Identifier, "a"),
                (TokenKind::Operator, "<="),
                (TokenKind::Identifier, "b"),
                (TokenKind::Operator, "&&"),
                (TokenKind::Identifier, "c"),
                (TokenKind::Operator, "!="),
                (TokenKind::Identifier, "d"),
                (TokenKind::Operator, "||"),
                (TokenKind::Operator, "!"),
                (TokenKind::Identifier, "e"),
                (TokenKind::Operator, "=="),
                (TokenKind::Identifier, "f"),
                (TokenKind::Operator, ">="),
                (TokenKind::Operator, "<"),
            ]
        );
    }

    #[test]
    fn lone_symbols_are_single_char_operators() {
        assert_eq!(
            kinds_and_texts("& | $"),
            vec![
                (TokenKind::Operator, "&"),
                (TokenKind::Operator, "|"),
                (TokenKind::Operator, "$"),
            ]
        );
    }

    #[test]
    fn errors_on_invalid_character() {
        let err = tokenize("x = \u{e9};").expect_err("expected lexing failure");
        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                character: '\u{e9}',
                offset: 4
            }
        );
        assert!(err.to_string().contains("Unexpected character"));
    }

    #[test]
    fn skips_backspace_and_carriage_returns() {
        assert_eq!(
            kinds_and_texts("a\u{8}\r\n\tb"),
            vec![(TokenKind::Identifier, "a"), (TokenKind::Identifier, "b")]
        );
    }

    #[test]
    fn tokens_round_trip_through_their_source_offsets() {
        let input = indoc! {r#"
            LET CONST limit: Integer = -10;
            DEF main(): Integer DO
                LET s = "a\"b" + 'c' + 1.25;
                IF limit <= 3 && s != "" DO print(s); END
                RETURN 0;
            END
        "#};
        for token in tokenize(input).expect("tokenize should succeed") {
            let slice = &input[token.offset..token.end()];
            let relexed = tokenize(slice).expect("slice should tokenize");
            assert_eq!(relexed, vec![Token::new(token.kind, token.text, 0)]);
        }
    }

    #[test]
    fn unescapes_literal_bodies() {
        assert_eq!(unescape(r#"a\tb\"c\\"#), "a\tb\"c\\");
        assert_eq!(unescape(r"\b\n\r\'"), "\u{8}\n\r'");
    }
}
