//! Type definitions
//!
//! A [`Type`] is a deep, immutable value. Equality and hashing look only at
//! the variant and its contents, so two independently built types with the
//! same shape are interchangeable.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::builtin::BuiltinType;
use crate::semantic::scope::ClassId;

/// Modifier wrapped around a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    /// Optional value, written `T?`
    Maybe,
}

/// A class type, possibly instantiated with template arguments
///
/// `scope` is a non-owning handle to the class symbol that declared it.
/// It is not part of the type's identity.
#[derive(Debug, Clone)]
pub struct ClassType {
    pub name: String,
    pub args: Vec<Type>,
    pub scope: Option<ClassId>,
}

impl ClassType {
    pub fn new(name: impl Into<String>, scope: Option<ClassId>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            scope,
        }
    }

    /// Build the instantiation of this class with concrete arguments
    pub fn instantiate(&self, args: Vec<Type>) -> Type {
        Type::Class(ClassType {
            name: self.name.clone(),
            args,
            scope: self.scope,
        })
    }
}

impl PartialEq for ClassType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.args == other.args
    }
}

impl Eq for ClassType {}

impl Hash for ClassType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.args.hash(state);
    }
}

/// Every type expressible in the language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Builtin(BuiltinType),
    Class(ClassType),
    Tuple(Vec<Type>),
    Func { params: Vec<Type>, ret: Box<Type> },
    /// Function without a return value
    Proc { params: Vec<Type> },
    Dict { key: Box<Type>, value: Box<Type> },
    Array(Box<Type>),
    Range { from: Box<Type>, to: Box<Type> },
    Qualified { qualifier: Qualifier, inner: Box<Type> },
}

impl Type {
    pub fn builtin(builtin: BuiltinType) -> Self {
        Type::Builtin(builtin)
    }

    pub fn int() -> Self {
        Type::Builtin(BuiltinType::Int)
    }

    pub fn bool() -> Self {
        Type::Builtin(BuiltinType::Bool)
    }

    /// The empty tuple, used as the value of procedure calls
    pub fn unit() -> Self {
        Type::Tuple(Vec::new())
    }

    pub fn class(name: impl Into<String>, scope: Option<ClassId>) -> Self {
        Type::Class(ClassType::new(name, scope))
    }

    pub fn tuple(elements: Vec<Type>) -> Self {
        Type::Tuple(elements)
    }

    pub fn func(params: Vec<Type>, ret: Type) -> Self {
        Type::Func {
            params,
            ret: Box::new(ret),
        }
    }

    pub fn proc(params: Vec<Type>) -> Self {
        Type::Proc { params }
    }

    pub fn dict(key: Type, value: Type) -> Self {
        Type::Dict {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn array(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    pub fn range(from: Type, to: Type) -> Self {
        Type::Range {
            from: Box::new(from),
            to: Box::new(to),
        }
    }

    pub fn qualified(qualifier: Qualifier, inner: Type) -> Self {
        Type::Qualified {
            qualifier,
            inner: Box::new(inner),
        }
    }

    pub fn maybe(inner: Type) -> Self {
        Type::qualified(Qualifier::Maybe, inner)
    }

    pub fn is_builtin(&self, builtin: BuiltinType) -> bool {
        matches!(self, Type::Builtin(b) if *b == builtin)
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Type::Tuple(elements) if elements.is_empty())
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for (i, t) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", t)?;
    }
    Ok(())
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Builtin(builtin) => write!(f, "{}", builtin),
            Type::Class(class) => {
                f.write_str(&class.name)?;
                if !class.args.is_empty() {
                    f.write_str("(")?;
                    write_list(f, &class.args)?;
                    f.write_str(")")?;
                }
                Ok(())
            }
            Type::Tuple(elements) => {
                f.write_str("(")?;
                write_list(f, elements)?;
                f.write_str(")")
            }
            Type::Func { params, ret } => {
                f.write_str("func (")?;
                write_list(f, params)?;
                write!(f, ") : {}", ret)
            }
            Type::Proc { params } => {
                f.write_str("proc (")?;
                write_list(f, params)?;
                f.write_str(")")
            }
            Type::Dict { key, value } => write!(f, "{{{} => {}}}", key, value),
            Type::Array(element) => write!(f, "{{{}}}", element),
            Type::Range { from, to } => write!(f, "{}..{}", from, to),
            Type::Qualified { qualifier, inner } => match qualifier {
                Qualifier::Maybe => write!(f, "{}?", inner),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use la_arena::Arena;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn string() -> Type {
        Type::builtin(BuiltinType::String)
    }

    #[test]
    fn test_independent_function_types_are_equal() {
        let a = Type::func(vec![Type::int(), Type::array(string())], Type::bool());
        let b = Type::func(vec![Type::int(), Type::array(string())], Type::bool());
        assert_eq!(a, b);
        assert_eq!(b, a);

        let c = Type::func(vec![Type::int(), Type::array(Type::int())], Type::bool());
        assert_ne!(a, c);
    }

    #[test]
    fn test_equality_is_transitive() {
        let a = Type::dict(string(), Type::maybe(Type::int()));
        let b = a.clone();
        let c = Type::dict(string(), Type::maybe(Type::int()));
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a, c);
    }

    #[test]
    fn test_variant_tag_matters() {
        let params = vec![Type::int()];
        assert_ne!(Type::proc(params.clone()), Type::tuple(params.clone()));
        assert_ne!(Type::func(params.clone(), Type::unit()), Type::proc(params));
        assert_ne!(Type::range(Type::int(), Type::int()), Type::dict(Type::int(), Type::int()));
    }

    #[test]
    fn test_dict_compares_key_and_value_independently() {
        let a = Type::dict(string(), Type::int());
        assert_ne!(a, Type::dict(Type::int(), Type::int()));
        assert_ne!(a, Type::dict(string(), string()));
    }

    #[test]
    fn test_class_equality_ignores_scope() {
        let mut arena = Arena::new();
        let first: ClassId = arena.alloc(crate::semantic::scope::ClassSymbol::new(
            "Point",
            crate::error::SourceLocation::at(1, 1),
        ));
        let second: ClassId = arena.alloc(crate::semantic::scope::ClassSymbol::new(
            "Point",
            crate::error::SourceLocation::at(9, 1),
        ));

        let a = Type::class("Point", Some(first));
        let b = Type::class("Point", Some(second));
        assert_eq!(a, b);

        let set: HashSet<Type> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_class_instantiation_builds_new_value() {
        let generic = ClassType::new("Box", None);
        let boxed_int = generic.instantiate(vec![Type::int()]);
        let boxed_str = generic.instantiate(vec![string()]);

        assert!(generic.args.is_empty());
        assert_ne!(boxed_int, boxed_str);
        assert_ne!(boxed_int, Type::Class(generic.clone()));
        assert_eq!(boxed_int.to_string(), "Box(int)");
    }

    #[test]
    fn test_qualified_compares_inner() {
        assert_eq!(Type::maybe(Type::int()), Type::maybe(Type::int()));
        assert_ne!(Type::maybe(Type::int()), Type::maybe(string()));
        assert_ne!(Type::maybe(Type::int()), Type::int());
    }

    #[test]
    fn test_rendering() {
        assert_eq!(Type::int().to_string(), "int");
        assert_eq!(Type::dict(string(), Type::int()).to_string(), "{string => int}");
        assert_eq!(Type::maybe(Type::int()).to_string(), "int?");
        assert_eq!(Type::array(Type::maybe(string())).to_string(), "{string?}");
        assert_eq!(Type::range(Type::int(), Type::int()).to_string(), "int..int");
        assert_eq!(
            Type::tuple(vec![Type::int(), string()]).to_string(),
            "(int,string)"
        );
        assert_eq!(
            Type::func(vec![Type::int(), Type::bool()], string()).to_string(),
            "func (int,bool) : string"
        );
        assert_eq!(Type::proc(vec![Type::int()]).to_string(), "proc (int)");
        assert_eq!(Type::class("Point", None).to_string(), "Point");
    }

    #[test]
    fn test_empty_lists_render_parentheses() {
        assert_eq!(Type::func(vec![], Type::int()).to_string(), "func () : int");
        assert_eq!(Type::proc(vec![]).to_string(), "proc ()");
        assert_eq!(Type::unit().to_string(), "()");
    }

    #[test]
    fn test_nested_rendering_is_deterministic() {
        let t = Type::func(
            vec![Type::dict(string(), Type::array(Type::int()))],
            Type::maybe(Type::tuple(vec![Type::int(), Type::bool()])),
        );
        assert_eq!(t.to_string(), "func ({string => {int}}) : (int,bool)?");
        assert_eq!(t.to_string(), t.clone().to_string());
    }
}
