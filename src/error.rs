use thiserror::Error;

use crate::analyzer::TypeError;
use crate::interpreter::RuntimeFault;
use crate::lexer::LexError;
use crate::parser::ParseError;

/// Failure from any stage of the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Type error: {0}")]
    Type(#[from] TypeError),
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeFault),
}

impl Error {
    /// Byte offset into the program text, when the stage recorded one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Lex(error) => Some(error.offset()),
            Error::Parse(error) => Some(error.offset()),
            Error::Type(error) => error.offset(),
            Error::Runtime(fault) => fault.offset,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
