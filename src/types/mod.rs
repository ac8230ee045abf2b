//! Type system module
//!
//! Structural, immutable type values shared by declaration checking,
//! overload resolution and diagnostics.

pub mod builtin;
pub mod type_def;

pub use builtin::{get_builtin_type, BuiltinType};
pub use type_def::{ClassType, Qualifier, Type};
