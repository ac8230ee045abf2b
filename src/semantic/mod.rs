//! Semantic analysis module
//!
//! Scope and overload resolution, plus the analysis pass that composes the
//! walker, the type system and the scope over a parsed program.

pub mod analyzer;
pub mod annotation;
mod collector;
mod resolver;
pub mod scope;
mod verify;

pub use analyzer::{analyze, analyze_program, Analysis, AnalyzerOptions};
pub use annotation::resolve_type_expr;
pub use scope::{
    call_signature, ClassId, ClassSymbol, FrozenScope, FuncSymbolId, FunctionSymbol, GlobalScope,
    ParamType,
};
