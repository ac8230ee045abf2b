//! Builtin (primitive) types

use std::fmt;

/// The primitive value kinds the language knows without a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Int,
    Uint,
    Float,
    Char,
    Bool,
    String,
    Symbol,
}

impl BuiltinType {
    /// All builtin types, in declaration order
    pub const ALL: [BuiltinType; 7] = [
        BuiltinType::Int,
        BuiltinType::Uint,
        BuiltinType::Float,
        BuiltinType::Char,
        BuiltinType::Bool,
        BuiltinType::String,
        BuiltinType::Symbol,
    ];

    /// Source-level spelling of the type
    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Int => "int",
            BuiltinType::Uint => "uint",
            BuiltinType::Float => "float",
            BuiltinType::Char => "char",
            BuiltinType::Bool => "bool",
            BuiltinType::String => "string",
            BuiltinType::Symbol => "symbol",
        }
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up a builtin type by its source spelling
pub fn get_builtin_type(name: &str) -> Option<BuiltinType> {
    BuiltinType::ALL.into_iter().find(|b| b.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(get_builtin_type("int"), Some(BuiltinType::Int));
        assert_eq!(get_builtin_type("symbol"), Some(BuiltinType::Symbol));
        assert_eq!(get_builtin_type("Int"), None);
        assert_eq!(get_builtin_type("Point"), None);
    }

    #[test]
    fn test_builtin_names_round_trip() {
        for builtin in BuiltinType::ALL {
            assert_eq!(get_builtin_type(builtin.name()), Some(builtin));
        }
    }
}
