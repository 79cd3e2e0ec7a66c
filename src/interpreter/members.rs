use rustc_hash::FxHashMap;

use crate::types::Type;

use super::scope::{Scope, ScopeRef};
use super::value::{Callable, Object};

/// Runtime counterpart of [`TypeRegistry`](crate::types::TypeRegistry): one
/// member scope per value kind, consulted for `value.name` when the value
/// carries no scope of its own.
///
/// Methods receive the receiver as their first argument and are stored under
/// `parameters + 1`, matching how call sites look them up.
#[derive(Debug, Clone, Default)]
pub struct MemberRegistry {
    members: FxHashMap<Type, ScopeRef>,
}

impl MemberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_field(&mut self, owner: Type, name: &str, constant: bool, value: Object) {
        self.scope_for(owner)
            .borrow_mut()
            .define_variable(name, constant, value);
    }

    pub fn register_method(
        &mut self,
        owner: Type,
        name: &str,
        parameters: usize,
        callable: Callable,
    ) {
        self.scope_for(owner)
            .borrow_mut()
            .define_function(name, parameters + 1, callable);
    }

    pub fn members(&self, owner: Type) -> Option<&ScopeRef> {
        self.members.get(&owner)
    }

    fn scope_for(&mut self, owner: Type) -> &ScopeRef {
        self.members.entry(owner).or_insert_with(Scope::root)
    }
}
