use std::io::Write;
use std::rc::Rc;

use tracing::debug;

use crate::ast::Source;
use crate::builtins::BuiltinFunction;

mod builtins;
mod error;
mod members;
mod runtime;
mod scope;
mod value;

pub use error::{RuntimeError, RuntimeFault, RuntimeResult};
pub use members::MemberRegistry;
pub use scope::{Binding, Scope, ScopeRef, WeakScopeRef};
pub use value::{Callable, NativeFunction, Object, Value};

use runtime::InterpreterRuntime;

/// AST-walking interpreter that executes a program directly.
///
/// Output from `print` goes to the writer given at construction. Fields and
/// methods are bound in the interpreter's own scope, a child of the parent
/// scope the host passes in. Members of plain values resolve through the
/// per-kind [`MemberRegistry`].
pub struct Interpreter<'o> {
    scope: ScopeRef,
    members: MemberRegistry,
    output: &'o mut dyn Write,
}

impl<'o> Interpreter<'o> {
    pub fn new(parent: &ScopeRef, output: &'o mut dyn Write) -> Self {
        let scope = Scope::child(parent);
        {
            let mut scope = scope.borrow_mut();
            for builtin in BuiltinFunction::ALL {
                let callable = Callable::Builtin(builtin);
                scope.define_function(builtin.name(), builtin.arity(), callable);
            }
        }
        Self {
            scope,
            members: MemberRegistry::new(),
            output,
        }
    }

    /// Replaces the per-kind members visible to `value.name` lookups.
    pub fn with_members(mut self, members: MemberRegistry) -> Self {
        self.members = members;
        self
    }

    pub fn scope(&self) -> &ScopeRef {
        &self.scope
    }

    /// Binds fields and methods, then calls `main/0` and returns its value.
    pub fn run(&mut self, source: &Source) -> RuntimeResult<Object> {
        // Execution pipeline:
        // run -> eval_expression (field initializers) -> eval_call (main)
        // -> exec_block -> exec_statement -> eval_expression -> eval_call.
        let mut runtime = InterpreterRuntime {
            output: &mut *self.output,
            members: &self.members,
        };

        for field in &source.fields {
            let value = match &field.value {
                Some(value) => runtime.eval_expression(value, &self.scope)?,
                None => Object::nil(),
            };
            self.scope
                .borrow_mut()
                .define_variable(&field.name, field.constant, value);
        }
        for method in &source.methods {
            let callable = Callable::Method {
                method: Rc::new(method.clone()),
                closure: Rc::downgrade(&self.scope),
            };
            self.scope
                .borrow_mut()
                .define_function(&method.name, method.parameters.len(), callable);
        }
        debug!(
            fields = source.fields.len(),
            methods = source.methods.len(),
            "bound program"
        );

        let main = self.scope.borrow().lookup_function("main", 0);
        let main = main.ok_or(RuntimeError::MissingMain)?;
        runtime.eval_call("main", &main, Vec::new())
    }
}
