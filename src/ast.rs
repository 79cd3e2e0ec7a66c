//! Syntax tree shared by the analyzer, the interpreter and the transpiler.
//!
//! The parser builds these nodes once. The analyzer then fills in the
//! annotation slots (`ty`, `variable`, `function`) in place; the interpreter
//! does not need them, and the transpiler only reads them.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::types::{Function, Type, Variable};

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Source {
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Field {
    pub name: String,
    pub type_name: Option<String>,
    pub constant: bool,
    pub value: Option<Expression>,
    pub variable: Option<Variable>,
    pub offset: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Parameter {
    pub name: String,
    pub type_name: Option<String>,
    pub offset: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Method {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type_name: Option<String>,
    pub statements: Vec<Statement>,
    pub function: Option<Function>,
    pub offset: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Declaration {
    pub name: String,
    pub type_name: Option<String>,
    pub value: Option<Expression>,
    pub variable: Option<Variable>,
    pub offset: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Expression(Expression),
    Declaration(Declaration),
    Assignment {
        receiver: Expression,
        value: Expression,
    },
    If {
        condition: Expression,
        then_statements: Vec<Statement>,
        else_statements: Vec<Statement>,
    },
    For {
        initialization: Option<Box<Statement>>,
        condition: Expression,
        increment: Option<Box<Statement>>,
        statements: Vec<Statement>,
    },
    While {
        condition: Expression,
        statements: Vec<Statement>,
    },
    Return(Expression),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Nil,
    Boolean(bool),
    Integer(BigInt),
    Decimal(BigDecimal),
    Character(char),
    String(String),
}

/// An expression node with its source offset and resolved static type.
#[derive(Debug, PartialEq, Clone)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub offset: usize,
    pub ty: Option<Type>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ExpressionKind {
    Literal(Literal),
    Group(Box<Expression>),
    Binary {
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Access {
        receiver: Option<Box<Expression>>,
        name: String,
        variable: Option<Variable>,
    },
    Function {
        receiver: Option<Box<Expression>>,
        name: String,
        arguments: Vec<Expression>,
        function: Option<Function>,
    },
}

/// Operators known to the analyzer and interpreter. Binary nodes keep the
/// operator text; any other symbol is rejected when the node is checked or
/// evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    And,
    Or,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let operator = match symbol {
            "&&" => Self::And,
            "||" => Self::Or,
            "<" => Self::Less,
            "<=" => Self::LessEqual,
            ">" => Self::Greater,
            ">=" => Self::GreaterEqual,
            "==" => Self::Equal,
            "!=" => Self::NotEqual,
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            _ => return None,
        };
        Some(operator)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Less
                | Self::LessEqual
                | Self::Greater
                | Self::GreaterEqual
                | Self::Equal
                | Self::NotEqual
        )
    }
}

impl Expression {
    pub fn new(kind: ExpressionKind, offset: usize) -> Self {
        Self {
            kind,
            offset,
            ty: None,
        }
    }

    pub fn literal(literal: Literal) -> Self {
        Self::new(ExpressionKind::Literal(literal), 0)
    }

    pub fn group(inner: Expression) -> Self {
        Self::new(ExpressionKind::Group(Box::new(inner)), 0)
    }

    pub fn binary(operator: &str, left: Expression, right: Expression) -> Self {
        Self::new(
            ExpressionKind::Binary {
                operator: operator.to_string(),
                left: Box::new(left),
                right: Box::new(right),
            },
            0,
        )
    }

    pub fn access(receiver: Option<Expression>, name: &str) -> Self {
        Self::new(
            ExpressionKind::Access {
                receiver: receiver.map(Box::new),
                name: name.to_string(),
                variable: None,
            },
            0,
        )
    }

    pub fn call(receiver: Option<Expression>, name: &str, arguments: Vec<Expression>) -> Self {
        Self::new(
            ExpressionKind::Function {
                receiver: receiver.map(Box::new),
                name: name.to_string(),
                arguments,
                function: None,
            },
            0,
        )
    }

    pub fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn is_access(&self) -> bool {
        matches!(self.kind, ExpressionKind::Access { .. })
    }

    pub fn is_call(&self) -> bool {
        matches!(self.kind, ExpressionKind::Function { .. })
    }
}

impl Field {
    pub fn new(
        name: &str,
        type_name: Option<&str>,
        constant: bool,
        value: Option<Expression>,
    ) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.map(str::to_string),
            constant,
            value,
            variable: None,
            offset: 0,
        }
    }

    pub fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

impl Parameter {
    pub fn new(name: &str, type_name: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.map(str::to_string),
            offset: 0,
        }
    }

    pub fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

impl Method {
    pub fn new(
        name: &str,
        parameters: Vec<Parameter>,
        return_type_name: Option<&str>,
        statements: Vec<Statement>,
    ) -> Self {
        Self {
            name: name.to_string(),
            parameters,
            return_type_name: return_type_name.map(str::to_string),
            statements,
            function: None,
            offset: 0,
        }
    }

    pub fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

impl Declaration {
    pub fn new(name: &str, type_name: Option<&str>, value: Option<Expression>) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.map(str::to_string),
            value,
            variable: None,
            offset: 0,
        }
    }

    pub fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Read-only traversal over an annotated tree, one operation per node variant.
///
/// Implementors receive shared references only, so they can inspect the
/// analyzer's annotations but never change them. `visit_statement` and
/// `visit_expression` dispatch to the per-variant operations.
pub trait Visitor {
    type Output;

    fn visit_source(&mut self, source: &Source) -> Self::Output;
    fn visit_field(&mut self, field: &Field) -> Self::Output;
    fn visit_method(&mut self, method: &Method) -> Self::Output;

    fn visit_expression_statement(&mut self, expression: &Expression) -> Self::Output;
    fn visit_declaration(&mut self, declaration: &Declaration) -> Self::Output;
    fn visit_assignment(&mut self, receiver: &Expression, value: &Expression) -> Self::Output;
    fn visit_if(
        &mut self,
        condition: &Expression,
        then_statements: &[Statement],
        else_statements: &[Statement],
    ) -> Self::Output;
    fn visit_for(
        &mut self,
        initialization: Option<&Statement>,
        condition: &Expression,
        increment: Option<&Statement>,
        statements: &[Statement],
    ) -> Self::Output;
    fn visit_while(&mut self, condition: &Expression, statements: &[Statement]) -> Self::Output;
    fn visit_return(&mut self, value: &Expression) -> Self::Output;

    fn visit_literal(&mut self, expression: &Expression, literal: &Literal) -> Self::Output;
    fn visit_group(&mut self, expression: &Expression, inner: &Expression) -> Self::Output;
    fn visit_binary(
        &mut self,
        expression: &Expression,
        operator: &str,
        left: &Expression,
        right: &Expression,
    ) -> Self::Output;
    fn visit_access(
        &mut self,
        expression: &Expression,
        receiver: Option<&Expression>,
        name: &str,
        variable: Option<&Variable>,
    ) -> Self::Output;
    fn visit_function(
        &mut self,
        expression: &Expression,
        receiver: Option<&Expression>,
        name: &str,
        arguments: &[Expression],
        function: Option<&Function>,
    ) -> Self::Output;

    fn visit_statement(&mut self, statement: &Statement) -> Self::Output {
        match statement {
            Statement::Expression(expression) => self.visit_expression_statement(expression),
            Statement::Declaration(declaration) => self.visit_declaration(declaration),
            Statement::Assignment { receiver, value } => self.visit_assignment(receiver, value),
            Statement::If {
                condition,
                then_statements,
                else_statements,
            } => self.visit_if(condition, then_statements, else_statements),
            Statement::For {
                initialization,
                condition,
                increment,
                statements,
            } => self.visit_for(
                initialization.as_deref(),
                condition,
                increment.as_deref(),
                statements,
            ),
            Statement::While {
                condition,
                statements,
            } => self.visit_while(condition, statements),
            Statement::Return(value) => self.visit_return(value),
        }
    }

    fn visit_expression(&mut self, expression: &Expression) -> Self::Output {
        match &expression.kind {
            ExpressionKind::Literal(literal) => self.visit_literal(expression, literal),
            ExpressionKind::Group(inner) => self.visit_group(expression, inner),
            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => self.visit_binary(expression, operator, left, right),
            ExpressionKind::Access {
                receiver,
                name,
                variable,
            } => self.visit_access(expression, receiver.as_deref(), name, variable.as_ref()),
            ExpressionKind::Function {
                receiver,
                name,
                arguments,
                function,
            } => self.visit_function(
                expression,
                receiver.as_deref(),
                name,
                arguments,
                function.as_ref(),
            ),
        }
    }
}
