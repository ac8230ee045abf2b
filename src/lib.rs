//! # Dachs Compiler Front End
//!
//! The semantic core of the Dachs compiler:
//! - a generic tree walker with continuation-style visitors
//! - a structural type system with canonical rendering
//! - global scope and overload resolution binding call sites to functions
//!
//! ## Architecture
//!
//! The implementation is organized into several modules:
//! - `ast`: Syntax tree nodes, resolution slots and the walker
//! - `types`: Type representation and builtin types
//! - `semantic`: Scope, overload resolution and the analysis pass
//! - `runtime`: C-callable print entry points (feature `runtime`)
//! - `error`: Error handling and diagnostics
//!
//! A parser hands over a [`Program`]; [`analyze`] fills every resolution
//! slot and returns the frozen global scope for code generation.

pub mod ast;
pub mod error;
#[cfg(feature = "runtime")]
pub mod runtime;
pub mod semantic;
pub mod types;

// Re-export commonly used types
pub use ast::{stringize_ast, walk, walk_program, Children, NodeRef, Program, Visitor};
pub use error::{DachsError, DachsResult, Diagnostic, SemanticErrorKind, SourceLocation};
pub use semantic::{analyze, analyze_program, Analysis, AnalyzerOptions, FrozenScope, GlobalScope};
pub use types::{BuiltinType, Type};

/// Version of the Dachs front end
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
