use thiserror::Error;

use crate::types::Type;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("Missing method main(): Integer")]
    MissingMain,
    #[error("Unknown type '{name}' at offset {offset}")]
    UnknownType { name: String, offset: usize },
    #[error("'{name}' is already defined in this scope at offset {offset}")]
    Redefinition { name: String, offset: usize },
    #[error("Declaration of '{name}' needs a type or an initial value at offset {offset}")]
    MissingDeclarationType { name: String, offset: usize },
    #[error("Constant '{name}' needs an initial value at offset {offset}")]
    ConstantWithoutValue { name: String, offset: usize },
    #[error("Undefined variable '{name}' at offset {offset}")]
    UndefinedVariable { name: String, offset: usize },
    #[error("Undefined function '{name}/{arity}' at offset {offset}")]
    UndefinedFunction {
        name: String,
        arity: usize,
        offset: usize,
    },
    #[error("Type {owner} has no member '{name}' at offset {offset}")]
    UnknownMember {
        owner: Type,
        name: String,
        offset: usize,
    },
    #[error("Expected {expected}, found {found} at offset {offset}")]
    NotAssignable {
        expected: Type,
        found: Type,
        offset: usize,
    },
    #[error("Expression statement must be a function call at offset {offset}")]
    ExpressionStatement { offset: usize },
    #[error("Assignment target must be a variable or field at offset {offset}")]
    InvalidAssignmentTarget { offset: usize },
    #[error("Cannot assign to constant '{name}' at offset {offset}")]
    AssignToConstant { name: String, offset: usize },
    #[error("IF without statements at offset {offset}")]
    EmptyThen { offset: usize },
    #[error("Parenthesized expression must be binary at offset {offset}")]
    InvalidGroup { offset: usize },
    #[error("Integer literal out of range at offset {offset}")]
    IntegerOutOfRange { offset: usize },
    #[error("Unsupported operator '{operator}' at offset {offset}")]
    UnknownOperator { operator: String, offset: usize },
    #[error("Operator '{operator}' cannot combine {left} and {right} at offset {offset}")]
    IncompatibleOperands {
        operator: String,
        left: Type,
        right: Type,
        offset: usize,
    },
}

impl TypeError {
    /// Source offset of the offending node. Only a missing `main` has none.
    pub fn offset(&self) -> Option<usize> {
        match self {
            TypeError::MissingMain => None,
            TypeError::UnknownType { offset, .. }
            | TypeError::Redefinition { offset, .. }
            | TypeError::MissingDeclarationType { offset, .. }
            | TypeError::ConstantWithoutValue { offset, .. }
            | TypeError::UndefinedVariable { offset, .. }
            | TypeError::UndefinedFunction { offset, .. }
            | TypeError::UnknownMember { offset, .. }
            | TypeError::NotAssignable { offset, .. }
            | TypeError::ExpressionStatement { offset }
            | TypeError::InvalidAssignmentTarget { offset }
            | TypeError::AssignToConstant { offset, .. }
            | TypeError::EmptyThen { offset }
            | TypeError::InvalidGroup { offset }
            | TypeError::IntegerOutOfRange { offset }
            | TypeError::UnknownOperator { offset, .. }
            | TypeError::IncompatibleOperands { offset, .. } => Some(*offset),
        }
    }
}

pub type TypeResult<T> = Result<T, TypeError>;
