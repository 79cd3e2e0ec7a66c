use rustc_hash::FxHashMap;

use crate::types::{Function, Variable};

/// Static binding environment. Each scope owns its parent, so entering a
/// block wraps the current scope and leaving it unwraps the parent again.
#[derive(Debug, Default)]
pub struct Scope {
    parent: Option<Box<Scope>>,
    variables: FxHashMap<String, Variable>,
    functions: FxHashMap<(String, usize), Function>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(parent: Scope) -> Self {
        Self {
            parent: Some(Box::new(parent)),
            ..Self::default()
        }
    }

    pub fn parent(&self) -> Option<&Scope> {
        self.parent.as_deref()
    }

    pub fn into_parent(self) -> Option<Scope> {
        self.parent.map(|parent| *parent)
    }

    pub fn define_variable(&mut self, variable: Variable) {
        self.variables.insert(variable.name.clone(), variable);
    }

    pub fn define_function(&mut self, function: Function) {
        self.functions
            .insert((function.name.clone(), function.arity()), function);
    }

    /// Whether `name` is bound in this scope itself, ignoring parents.
    pub fn declares_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn declares_function(&self, name: &str, arity: usize) -> bool {
        self.functions.contains_key(&(name.to_string(), arity))
    }

    pub fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        match self.variables.get(name) {
            Some(variable) => Some(variable),
            None => self.parent()?.lookup_variable(name),
        }
    }

    pub fn lookup_function(&self, name: &str, arity: usize) -> Option<&Function> {
        match self.functions.get(&(name.to_string(), arity)) {
            Some(function) => Some(function),
            None => self.parent()?.lookup_function(name, arity),
        }
    }
}
