use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Expected {expected}, got '{found}' at offset {offset}")]
    Expected {
        expected: String,
        found: String,
        offset: usize,
    },
    #[error("Expected {expected}, got end of input at offset {offset}")]
    UnexpectedEnd { expected: String, offset: usize },
    #[error("Invalid {kind} literal '{literal}' at offset {offset}")]
    InvalidLiteral {
        kind: &'static str,
        literal: String,
        offset: usize,
    },
}

impl ParseError {
    pub fn offset(&self) -> usize {
        match self {
            ParseError::Expected { offset, .. }
            | ParseError::UnexpectedEnd { offset, .. }
            | ParseError::InvalidLiteral { offset, .. } => *offset,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
