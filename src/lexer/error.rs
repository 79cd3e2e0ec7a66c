use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Unexpected character '{character}' at offset {offset}")]
    UnexpectedCharacter { character: char, offset: usize },
    #[error("Invalid number literal '{literal}' at offset {offset}: {reason}")]
    InvalidNumber {
        literal: String,
        reason: &'static str,
        offset: usize,
    },
    #[error("Invalid character literal at offset {offset}")]
    InvalidCharacter { offset: usize },
    #[error("Unterminated character literal at offset {offset}")]
    UnterminatedCharacter { offset: usize },
    #[error("Unterminated string literal at offset {offset}")]
    UnterminatedString { offset: usize },
    #[error("Invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },
}

impl LexError {
    pub fn offset(&self) -> usize {
        match self {
            LexError::UnexpectedCharacter { offset, .. }
            | LexError::InvalidNumber { offset, .. }
            | LexError::InvalidCharacter { offset }
            | LexError::UnterminatedCharacter { offset }
            | LexError::UnterminatedString { offset }
            | LexError::InvalidEscape { offset } => *offset,
        }
    }
}

pub type LexResult<T> = Result<T, LexError>;
