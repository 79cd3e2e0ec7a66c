use std::io::Write;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_traits::ToPrimitive;

use crate::builtins::BuiltinFunction;

use super::RuntimeError;
use super::value::{Object, Value};

pub(super) fn call_builtin(
    builtin: BuiltinFunction,
    arguments: Vec<Object>,
    output: &mut dyn Write,
) -> Result<Object, RuntimeError> {
    let argument = arguments.into_iter().next().unwrap_or_else(Object::nil);
    match builtin {
        BuiltinFunction::Print => {
            writeln!(output, "{argument}").map_err(|error| RuntimeError::Output {
                message: error.to_string(),
            })?;
            Ok(Object::nil())
        }
        BuiltinFunction::Log => {
            log(&argument.value).map(|value| Object::new(Value::Decimal(value)))
        }
    }
}

/// Natural logarithm, computed in double precision. Integers are accepted and
/// widened first.
fn log(argument: &Value) -> Result<BigDecimal, RuntimeError> {
    let number = match argument {
        Value::Decimal(value) => value.to_f64(),
        Value::Integer(value) => value.to_f64(),
        other => {
            return Err(RuntimeError::InvalidArgument {
                function: BuiltinFunction::Log.name(),
                expected: "Decimal",
                found: other.kind_name(),
            });
        }
    };
    let result = number.map(f64::ln).filter(|result| result.is_finite());
    result
        .and_then(|result| BigDecimal::from_str(&result.to_string()).ok())
        .ok_or_else(|| RuntimeError::UndefinedLogarithm {
            argument: argument.to_string(),
        })
}
