//! Syntax tree module
//!
//! Node definitions handed over by the parser, the write-once resolution
//! slots filled during analysis, and the traversal engine every pass uses.

pub mod node;
pub mod slot;
pub mod stringize;
pub mod walker;

pub use node::*;
pub use slot::Slot;
pub use stringize::{stringize_ast, stringize_node};
pub use walker::{walk, walk_program, Children, IntoChildren, NodeRef, Visitor};
