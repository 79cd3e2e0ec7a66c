use crate::types::{Function, Type};

/// Functions every program can call without defining them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFunction {
    Print,
    Log,
}

impl BuiltinFunction {
    pub const ALL: [BuiltinFunction; 2] = [Self::Print, Self::Log];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "print" => Some(Self::Print),
            "log" => Some(Self::Log),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::Log => "log",
        }
    }

    pub fn target_name(self) -> &'static str {
        match self {
            Self::Print => "System.out.println",
            Self::Log => "Math.log",
        }
    }

    pub fn arity(self) -> usize {
        1
    }

    /// The static signature the analyzer registers for this builtin.
    pub fn signature(self) -> Function {
        let (parameter_types, return_type) = match self {
            Self::Print => (vec![Type::Any], Type::Nil),
            Self::Log => (vec![Type::Decimal], Type::Decimal),
        };
        Function::new(self.name(), self.target_name(), parameter_types, return_type)
    }
}
