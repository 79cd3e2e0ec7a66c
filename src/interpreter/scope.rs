use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use super::RuntimeError;
use super::value::{Callable, Object};

pub type ScopeRef = Rc<RefCell<Scope>>;

/// Non-owning handle held by method closures, so a scope never keeps itself
/// alive through the methods it stores.
pub type WeakScopeRef = Weak<RefCell<Scope>>;

#[derive(Debug, Clone)]
pub struct Binding {
    pub constant: bool,
    pub value: Object,
}

/// Runtime environment shared between blocks and the method closures that
/// capture it.
#[derive(Default)]
pub struct Scope {
    parent: Option<ScopeRef>,
    variables: FxHashMap<String, Binding>,
    functions: FxHashMap<(String, usize), Callable>,
}

impl Scope {
    pub fn root() -> ScopeRef {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn child(parent: &ScopeRef) -> ScopeRef {
        Rc::new(RefCell::new(Self {
            parent: Some(Rc::clone(parent)),
            ..Self::default()
        }))
    }

    pub fn define_variable(&mut self, name: &str, constant: bool, value: Object) {
        self.variables
            .insert(name.to_string(), Binding { constant, value });
    }

    pub fn lookup_variable(&self, name: &str) -> Option<Binding> {
        match self.variables.get(name) {
            Some(binding) => Some(binding.clone()),
            None => self.parent.as_ref()?.borrow().lookup_variable(name),
        }
    }

    /// Rebinds the nearest `name`, failing on constants and unknown names.
    pub fn assign_variable(&mut self, name: &str, value: Object) -> Result<(), RuntimeError> {
        if let Some(binding) = self.variables.get_mut(name) {
            if binding.constant {
                return Err(RuntimeError::AssignToConstant {
                    name: name.to_string(),
                });
            }
            binding.value = value;
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().assign_variable(name, value),
            None => Err(RuntimeError::UndefinedVariable {
                name: name.to_string(),
            }),
        }
    }

    pub fn define_function(&mut self, name: &str, arity: usize, callable: Callable) {
        self.functions.insert((name.to_string(), arity), callable);
    }

    pub fn lookup_function(&self, name: &str, arity: usize) -> Option<Callable> {
        match self.functions.get(&(name.to_string(), arity)) {
            Some(callable) => Some(callable.clone()),
            None => self
                .parent
                .as_ref()?
                .borrow()
                .lookup_function(name, arity),
        }
    }
}

// Method closures point back at their defining scope; print names only.
impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut variables: Vec<_> = self.variables.keys().collect();
        variables.sort();
        let mut functions: Vec<_> = self.functions.keys().collect();
        functions.sort();
        f.debug_struct("Scope")
            .field("variables", &variables)
            .field("functions", &functions)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
