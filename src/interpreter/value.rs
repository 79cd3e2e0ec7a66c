use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::ast::{self, Literal};
use crate::builtins::BuiltinFunction;
use crate::types::Type;

use super::RuntimeError;
use super::scope::{ScopeRef, WeakScopeRef};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Boolean(bool),
    Integer(BigInt),
    Decimal(BigDecimal),
    Character(char),
    String(String),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Boolean(_) => "Boolean",
            Value::Integer(_) => "Integer",
            Value::Decimal(_) => "Decimal",
            Value::Character(_) => "Character",
            Value::String(_) => "String",
        }
    }

    /// Static type whose member table describes this value.
    pub fn ty(&self) -> Type {
        match self {
            Value::Nil => Type::Nil,
            Value::Boolean(_) => Type::Boolean,
            Value::Integer(_) => Type::Integer,
            Value::Decimal(_) => Type::Decimal,
            Value::Character(_) => Type::Character,
            Value::String(_) => Type::String,
        }
    }

    pub fn as_bool(&self) -> Result<bool, RuntimeError> {
        match self {
            Value::Boolean(value) => Ok(*value),
            other => Err(RuntimeError::ExpectedBoolean {
                found: other.kind_name(),
            }),
        }
    }

    /// Orders two values of the same kind. Booleans order `false < true`.
    pub fn compare(&self, other: &Value, operator: &str) -> Result<Ordering, RuntimeError> {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
            (Value::Decimal(a), Value::Decimal(b)) => Ok(a.cmp(b)),
            (Value::Character(a), Value::Character(b)) => Ok(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
            _ => Err(invalid_operands(operator, self, other)),
        }
    }

    pub fn add(&self, other: &Value) -> Result<Value, RuntimeError> {
        match (self, other) {
            (Value::String(_), _) | (_, Value::String(_)) => {
                Ok(Value::String(format!("{self}{other}")))
            }
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a + b)),
            (Value::Decimal(a), Value::Decimal(b)) => Ok(Value::Decimal(a + b)),
            _ => Err(invalid_operands("+", self, other)),
        }
    }

    pub fn subtract(&self, other: &Value) -> Result<Value, RuntimeError> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a - b)),
            (Value::Decimal(a), Value::Decimal(b)) => Ok(Value::Decimal(a - b)),
            _ => Err(invalid_operands("-", self, other)),
        }
    }

    pub fn multiply(&self, other: &Value) -> Result<Value, RuntimeError> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a * b)),
            (Value::Decimal(a), Value::Decimal(b)) => Ok(Value::Decimal(a * b)),
            _ => Err(invalid_operands("*", self, other)),
        }
    }

    /// Integer division truncates toward zero; decimal division keeps the
    /// dividend's scale and rounds half to even.
    pub fn divide(&self, other: &Value) -> Result<Value, RuntimeError> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => {
                if b.is_zero() {
                    return Err(RuntimeError::DivisionByZero);
                }
                Ok(Value::Integer(a / b))
            }
            (Value::Decimal(a), Value::Decimal(b)) => {
                if b.is_zero() {
                    return Err(RuntimeError::DivisionByZero);
                }
                Ok(Value::Decimal(divide_half_even(a, b)))
            }
            _ => Err(invalid_operands("/", self, other)),
        }
    }
}

fn invalid_operands(operator: &str, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::InvalidOperands {
        operator: operator.to_string(),
        left: left.kind_name(),
        right: right.kind_name(),
    }
}

fn divide_half_even(dividend: &BigDecimal, divisor: &BigDecimal) -> BigDecimal {
    let (mut numerator, scale) = dividend.as_bigint_and_exponent();
    let (mut denominator, divisor_scale) = divisor.as_bigint_and_exponent();
    let shift = num_traits::pow(BigInt::from(10), divisor_scale.unsigned_abs() as usize);
    if divisor_scale >= 0 {
        numerator *= shift;
    } else {
        denominator *= shift;
    }

    let quotient = &numerator / &denominator;
    let remainder = &numerator % &denominator;
    let step = if numerator.is_negative() != denominator.is_negative() {
        BigInt::from(-1)
    } else {
        BigInt::from(1)
    };
    let rounded = match (remainder.abs() * 2u32).cmp(&denominator.abs()) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + step,
        Ordering::Equal if (&quotient % 2u32).is_zero() => quotient,
        Ordering::Equal => quotient + step,
    };
    BigDecimal::new(rounded, scale)
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Nil => Value::Nil,
            Literal::Boolean(value) => Value::Boolean(*value),
            Literal::Integer(value) => Value::Integer(value.clone()),
            Literal::Decimal(value) => Value::Decimal(value.clone()),
            Literal::Character(value) => Value::Character(*value),
            Literal::String(value) => Value::String(value.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Decimal(value) => write!(f, "{value}"),
            Value::Character(value) => write!(f, "{value}"),
            Value::String(value) => f.write_str(value),
        }
    }
}

/// A runtime value plus an optional member scope of its own. Values without
/// one resolve `value.name` through the interpreter's per-kind members.
#[derive(Debug, Clone)]
pub struct Object {
    pub value: Value,
    pub members: Option<ScopeRef>,
}

impl Object {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            members: None,
        }
    }

    pub fn with_members(value: Value, members: ScopeRef) -> Self {
        Self {
            value,
            members: Some(members),
        }
    }

    pub fn nil() -> Self {
        Self::new(Value::Nil)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

pub type NativeFunction = dyn Fn(Vec<Object>) -> Result<Object, RuntimeError>;

/// Anything a `Function` expression can invoke.
#[derive(Clone)]
pub enum Callable {
    Builtin(BuiltinFunction),
    Method {
        method: Rc<ast::Method>,
        closure: WeakScopeRef,
    },
    Native(Rc<NativeFunction>),
}

impl Callable {
    pub fn native(
        function: impl Fn(Vec<Object>) -> Result<Object, RuntimeError> + 'static,
    ) -> Self {
        Callable::Native(Rc::new(function))
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Builtin(builtin) => f.debug_tuple("Builtin").field(builtin).finish(),
            Callable::Method { method, .. } => f.debug_tuple("Method").field(&method.name).finish(),
            Callable::Native(_) => f.write_str("Native"),
        }
    }
}
