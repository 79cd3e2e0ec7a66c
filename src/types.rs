//! Static types and the bindings the analyzer attaches to the AST.
//!
//! `Variable` and `Function` are the resolved forms of names: the analyzer
//! stores them on `Access`/`Function` nodes (and on fields, declarations and
//! methods) so later passes such as the transpiler can read types and target
//! names without repeating resolution.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::analyzer::Scope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Any,
    Nil,
    Comparable,
    Boolean,
    Integer,
    Decimal,
    Character,
    String,
}

impl Type {
    pub const ALL: [Type; 8] = [
        Type::Any,
        Type::Nil,
        Type::Comparable,
        Type::Boolean,
        Type::Integer,
        Type::Decimal,
        Type::Character,
        Type::String,
    ];

    pub fn from_name(name: &str) -> Option<Type> {
        Type::ALL.into_iter().find(|ty| ty.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Type::Any => "Any",
            Type::Nil => "Nil",
            Type::Comparable => "Comparable",
            Type::Boolean => "Boolean",
            Type::Integer => "Integer",
            Type::Decimal => "Decimal",
            Type::Character => "Character",
            Type::String => "String",
        }
    }

    /// Name of the type in generated Java source.
    pub fn target_name(self) -> &'static str {
        match self {
            Type::Any => "Object",
            Type::Nil => "Void",
            Type::Comparable => "Comparable",
            Type::Boolean => "boolean",
            Type::Integer => "int",
            Type::Decimal => "double",
            Type::Character => "char",
            Type::String => "String",
        }
    }

    pub fn is_comparable(self) -> bool {
        matches!(
            self,
            Type::Comparable | Type::Integer | Type::Decimal | Type::Character | Type::String
        )
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Type::Integer | Type::Decimal)
    }

    /// Whether a value of type `ty` may be used where `self` is required.
    pub fn accepts(self, ty: Type) -> bool {
        self == ty || self == Type::Any || (self == Type::Comparable && ty.is_comparable())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub target_name: String,
    pub ty: Type,
    pub constant: bool,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: Type, constant: bool) -> Self {
        let name = name.into();
        Self {
            target_name: name.clone(),
            name,
            ty,
            constant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub target_name: String,
    pub parameter_types: Vec<Type>,
    pub return_type: Type,
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        target_name: impl Into<String>,
        parameter_types: Vec<Type>,
        return_type: Type,
    ) -> Self {
        Self {
            name: name.into(),
            target_name: target_name.into(),
            parameter_types,
            return_type,
        }
    }

    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }
}

/// Per-type member tables consulted when an access or call has a receiver.
///
/// Methods are stored with the receiver as their first parameter, so a call
/// `value.name(a, b)` resolves `name` with arity 3.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    members: FxHashMap<Type, Scope>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_field(&mut self, owner: Type, name: &str, ty: Type, constant: bool) {
        self.members
            .entry(owner)
            .or_default()
            .define_variable(Variable::new(name, ty, constant));
    }

    pub fn register_method(
        &mut self,
        owner: Type,
        name: &str,
        parameter_types: Vec<Type>,
        return_type: Type,
    ) {
        let mut parameters = Vec::with_capacity(parameter_types.len() + 1);
        parameters.push(owner);
        parameters.extend(parameter_types);
        self.members
            .entry(owner)
            .or_default()
            .define_function(Function::new(name, name, parameters, return_type));
    }

    pub fn field(&self, owner: Type, name: &str) -> Option<&Variable> {
        self.members.get(&owner)?.lookup_variable(name)
    }

    /// Looks up a method by the number of explicit arguments at the call site.
    pub fn method(&self, owner: Type, name: &str, arguments: usize) -> Option<&Function> {
        self.members
            .get(&owner)?
            .lookup_function(name, arguments + 1)
    }
}
