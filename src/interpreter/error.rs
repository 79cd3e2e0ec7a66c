use thiserror::Error;

/// Typed errors produced while executing a program.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },
    #[error("Undefined function '{name}/{arity}'")]
    UndefinedFunction { name: String, arity: usize },
    #[error("Value has no member '{name}'")]
    UndefinedMember { name: String },
    #[error("Cannot assign to constant '{name}'")]
    AssignToConstant { name: String },
    #[error("Assignment target must be a variable or field")]
    InvalidAssignmentTarget,
    #[error("Expected Boolean, got {found}")]
    ExpectedBoolean { found: &'static str },
    #[error("Unsupported operator '{operator}'")]
    UnknownOperator { operator: String },
    #[error("Operator '{operator}' cannot combine {left} and {right}")]
    InvalidOperands {
        operator: String,
        left: &'static str,
        right: &'static str,
    },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Invalid argument for '{function}': expected {expected}, got {found}")]
    InvalidArgument {
        function: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Logarithm of {argument} is undefined")]
    UndefinedLogarithm { argument: String },
    #[error("Method '{name}' outlived the scope that defined it")]
    ClosedScope { name: String },
    #[error("Missing method main/0")]
    MissingMain,
    #[error("Failed to write output: {message}")]
    Output { message: String },
}

/// A runtime error together with the offset of the innermost expression that
/// was being evaluated when it occurred.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{error}{}", describe_offset(.offset))]
pub struct RuntimeFault {
    pub error: RuntimeError,
    pub offset: Option<usize>,
}

impl RuntimeFault {
    /// Attaches `offset` unless a more precise one is already recorded.
    pub fn at(mut self, offset: usize) -> Self {
        self.offset.get_or_insert(offset);
        self
    }
}

impl From<RuntimeError> for RuntimeFault {
    fn from(error: RuntimeError) -> Self {
        Self {
            error,
            offset: None,
        }
    }
}

fn describe_offset(offset: &Option<usize>) -> String {
    offset
        .map(|offset| format!(" at offset {offset}"))
        .unwrap_or_default()
}

pub type RuntimeResult<T> = Result<T, RuntimeFault>;
