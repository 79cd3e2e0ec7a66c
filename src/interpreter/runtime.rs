use std::cmp::Ordering;
use std::io::Write;
use std::rc::Rc;

use tracing::trace;

use crate::ast::{BinaryOperator, Expression, ExpressionKind, Statement};

use super::builtins::call_builtin;
use super::members::MemberRegistry;
use super::scope::{Scope, ScopeRef};
use super::value::{Callable, Object, Value};
use super::{RuntimeError, RuntimeFault, RuntimeResult};

/// Control-flow marker for statement execution.
pub(super) enum ExecResult {
    Continue,
    Return(Object),
}

/// Tree-walking executor. The active scope is always passed in, so leaving a
/// block (normally or through `?`) returns to the caller's scope untouched.
pub(super) struct InterpreterRuntime<'r> {
    pub(super) output: &'r mut dyn Write,
    pub(super) members: &'r MemberRegistry,
}

impl InterpreterRuntime<'_> {
    pub(super) fn exec_block(
        &mut self,
        statements: &[Statement],
        scope: &ScopeRef,
    ) -> RuntimeResult<ExecResult> {
        for statement in statements {
            if let ExecResult::Return(value) = self.exec_statement(statement, scope)? {
                return Ok(ExecResult::Return(value));
            }
        }
        Ok(ExecResult::Continue)
    }

    fn exec_child_block(
        &mut self,
        statements: &[Statement],
        scope: &ScopeRef,
    ) -> RuntimeResult<ExecResult> {
        let child = Scope::child(scope);
        self.exec_block(statements, &child)
    }

    fn exec_statement(
        &mut self,
        statement: &Statement,
        scope: &ScopeRef,
    ) -> RuntimeResult<ExecResult> {
        match statement {
            Statement::Expression(expression) => {
                self.eval_expression(expression, scope)?;
            }
            Statement::Declaration(declaration) => {
                let value = match &declaration.value {
                    Some(value) => self.eval_expression(value, scope)?,
                    None => Object::nil(),
                };
                scope
                    .borrow_mut()
                    .define_variable(&declaration.name, false, value);
            }
            Statement::Assignment { receiver, value } => {
                self.exec_assignment(receiver, value, scope)?;
            }
            Statement::If {
                condition,
                then_statements,
                else_statements,
            } => {
                let branch = if self.eval_condition(condition, scope)? {
                    then_statements
                } else {
                    else_statements
                };
                return self.exec_child_block(branch, scope);
            }
            Statement::For {
                initialization,
                condition,
                increment,
                statements,
            } => {
                if let Some(initialization) = initialization {
                    self.exec_statement(initialization, scope)?;
                }
                while self.eval_condition(condition, scope)? {
                    if let ExecResult::Return(value) = self.exec_child_block(statements, scope)? {
                        return Ok(ExecResult::Return(value));
                    }
                    if let Some(increment) = increment {
                        self.exec_statement(increment, scope)?;
                    }
                }
            }
            Statement::While {
                condition,
                statements,
            } => {
                while self.eval_condition(condition, scope)? {
                    if let ExecResult::Return(value) = self.exec_child_block(statements, scope)? {
                        return Ok(ExecResult::Return(value));
                    }
                }
            }
            Statement::Return(value) => {
                return Ok(ExecResult::Return(self.eval_expression(value, scope)?));
            }
        }
        Ok(ExecResult::Continue)
    }

    fn exec_assignment(
        &mut self,
        receiver: &Expression,
        value: &Expression,
        scope: &ScopeRef,
    ) -> RuntimeResult<()> {
        let ExpressionKind::Access {
            receiver: owner,
            name,
            ..
        } = &receiver.kind
        else {
            let fault = RuntimeFault::from(RuntimeError::InvalidAssignmentTarget);
            return Err(fault.at(receiver.offset));
        };
        let target = match owner {
            Some(owner) => {
                let object = self.eval_expression(owner, scope)?;
                self.members_of(&object, name).map_err(|fault| fault.at(receiver.offset))?
            }
            None => Rc::clone(scope),
        };
        let value = self.eval_expression(value, scope)?;
        target
            .borrow_mut()
            .assign_variable(name, value)
            .map_err(|error| RuntimeFault::from(error).at(receiver.offset))
    }

    fn eval_condition(&mut self, condition: &Expression, scope: &ScopeRef) -> RuntimeResult<bool> {
        let value = self.eval_expression(condition, scope)?;
        value
            .value
            .as_bool()
            .map_err(|error| RuntimeFault::from(error).at(condition.offset))
    }

    pub(super) fn eval_expression(
        &mut self,
        expression: &Expression,
        scope: &ScopeRef,
    ) -> RuntimeResult<Object> {
        self.eval_kind(&expression.kind, scope)
            .map_err(|fault| fault.at(expression.offset))
    }

    fn eval_kind(&mut self, kind: &ExpressionKind, scope: &ScopeRef) -> RuntimeResult<Object> {
        match kind {
            ExpressionKind::Literal(literal) => Ok(Object::new(Value::from(literal))),
            ExpressionKind::Group(inner) => self.eval_expression(inner, scope),
            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => self.eval_binary(operator, left, right, scope),
            ExpressionKind::Access { receiver, name, .. } => match receiver {
                Some(receiver) => {
                    let object = self.eval_expression(receiver, scope)?;
                    let members = self.members_of(&object, name)?;
                    let binding = members.borrow().lookup_variable(name);
                    binding
                        .map(|binding| binding.value)
                        .ok_or_else(|| undefined_member(name))
                }
                None => {
                    let binding = scope.borrow().lookup_variable(name);
                    binding.map(|binding| binding.value).ok_or_else(|| {
                        RuntimeError::UndefinedVariable {
                            name: name.clone(),
                        }
                        .into()
                    })
                }
            },
            ExpressionKind::Function {
                receiver,
                name,
                arguments,
                ..
            } => match receiver {
                Some(receiver) => {
                    let object = self.eval_expression(receiver, scope)?;
                    let members = self.members_of(&object, name)?;
                    let callable = members.borrow().lookup_function(name, arguments.len() + 1);
                    let callable = callable.ok_or_else(|| undefined_member(name))?;
                    let mut values = Vec::with_capacity(arguments.len() + 1);
                    values.push(object);
                    values.extend(self.eval_arguments(arguments, scope)?);
                    self.eval_call(name, &callable, values)
                }
                None => {
                    let callable = scope.borrow().lookup_function(name, arguments.len());
                    let callable = callable.ok_or_else(|| RuntimeError::UndefinedFunction {
                        name: name.clone(),
                        arity: arguments.len(),
                    })?;
                    let values = self.eval_arguments(arguments, scope)?;
                    self.eval_call(name, &callable, values)
                }
            },
        }
    }

    fn eval_arguments(
        &mut self,
        arguments: &[Expression],
        scope: &ScopeRef,
    ) -> RuntimeResult<Vec<Object>> {
        arguments
            .iter()
            .map(|argument| self.eval_expression(argument, scope))
            .collect()
    }

    pub(super) fn eval_call(
        &mut self,
        name: &str,
        callable: &Callable,
        arguments: Vec<Object>,
    ) -> RuntimeResult<Object> {
        match callable {
            Callable::Builtin(builtin) => Ok(call_builtin(*builtin, arguments, &mut *self.output)?),
            Callable::Native(function) => Ok((function.as_ref())(arguments)?),
            Callable::Method { method, closure } => {
                trace!(method = name, arity = arguments.len(), "invoking method");
                let closure = closure.upgrade().ok_or_else(|| RuntimeError::ClosedScope {
                    name: name.to_string(),
                })?;
                let frame = Scope::child(&closure);
                {
                    let mut frame = frame.borrow_mut();
                    for (parameter, argument) in method.parameters.iter().zip(arguments) {
                        frame.define_variable(&parameter.name, false, argument);
                    }
                }
                match self.exec_block(&method.statements, &frame)? {
                    ExecResult::Return(value) => Ok(value),
                    ExecResult::Continue => Ok(Object::nil()),
                }
            }
        }
    }

    fn eval_binary(
        &mut self,
        operator: &str,
        left: &Expression,
        right: &Expression,
        scope: &ScopeRef,
    ) -> RuntimeResult<Object> {
        let binary = BinaryOperator::from_symbol(operator).ok_or_else(|| {
            RuntimeError::UnknownOperator {
                operator: operator.to_string(),
            }
        })?;

        if binary.is_logical() {
            let lhs = self.eval_condition(left, scope)?;
            // && stops on false, || stops on true.
            let value = if lhs == (binary == BinaryOperator::Or) {
                lhs
            } else {
                self.eval_condition(right, scope)?
            };
            return Ok(Object::new(Value::Boolean(value)));
        }

        let lhs = self.eval_expression(left, scope)?.value;
        let rhs = self.eval_expression(right, scope)?.value;
        Ok(Object::new(apply_binary(binary, operator, &lhs, &rhs)?))
    }

    /// Member scope for `object`: its own, else the one registered for its kind.
    fn members_of(&self, object: &Object, name: &str) -> RuntimeResult<ScopeRef> {
        object
            .members
            .clone()
            .or_else(|| self.members.members(object.value.ty()).cloned())
            .ok_or_else(|| undefined_member(name))
    }
}

fn apply_binary(
    binary: BinaryOperator,
    operator: &str,
    lhs: &Value,
    rhs: &Value,
) -> Result<Value, RuntimeError> {
    let value = match binary {
        BinaryOperator::And | BinaryOperator::Or => {
            unreachable!("logical operators short-circuit in eval_binary")
        }
        BinaryOperator::Equal => Value::Boolean(lhs == rhs),
        BinaryOperator::NotEqual => Value::Boolean(lhs != rhs),
        BinaryOperator::Less => Value::Boolean(lhs.compare(rhs, operator)? == Ordering::Less),
        BinaryOperator::LessEqual => {
            Value::Boolean(lhs.compare(rhs, operator)? != Ordering::Greater)
        }
        BinaryOperator::Greater => Value::Boolean(lhs.compare(rhs, operator)? == Ordering::Greater),
        BinaryOperator::GreaterEqual => {
            Value::Boolean(lhs.compare(rhs, operator)? != Ordering::Less)
        }
        BinaryOperator::Add => lhs.add(rhs)?,
        BinaryOperator::Sub => lhs.subtract(rhs)?,
        BinaryOperator::Mul => lhs.multiply(rhs)?,
        BinaryOperator::Div => lhs.divide(rhs)?,
    };
    Ok(value)
}

fn undefined_member(name: &str) -> RuntimeFault {
    RuntimeError::UndefinedMember {
        name: name.to_string(),
    }
    .into()
}
