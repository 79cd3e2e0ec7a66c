//! Front end, static analyzer, interpreter and Java generator for a small
//! imperative language of fields and methods.
//!
//! Each stage can be driven on its own; [`check`], [`run`] and [`transpile`]
//! chain them for whole programs.

use std::io::Write;

use tracing::debug;

pub mod analyzer;
pub mod ast;
pub mod builtins;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod transpiler;
pub mod types;

pub use error::{Error, Result};

use analyzer::Analyzer;
use ast::Source;
use interpreter::{Interpreter, Object, Scope};
use transpiler::Transpiler;

/// Lexes, parses and analyzes `text`, returning the annotated tree.
pub fn check(text: &str) -> Result<Source> {
    let tokens = lexer::tokenize(text)?;
    debug!(tokens = tokens.len(), "tokenized");
    let mut source = parser::parse(&tokens)?;
    Analyzer::new(analyzer::Scope::new()).analyze(&mut source)?;
    Ok(source)
}

/// Checks `text` and runs its `main` method, writing `print` output to
/// `output`. Returns the value `main` returned.
pub fn run(text: &str, output: &mut dyn Write) -> Result<Object> {
    let source = check(text)?;
    let mut interpreter = Interpreter::new(&Scope::root(), output);
    Ok(interpreter.run(&source)?)
}

/// Checks `text` and renders it as Java source.
pub fn transpile(text: &str) -> Result<String> {
    let source = check(text)?;
    Ok(Transpiler::transpile(&source))
}
