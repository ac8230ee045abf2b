//! Runtime module
//!
//! The C-callable print surface compiled programs link against. It is
//! independent of the front end and only built with the `runtime` feature.

pub mod io;

pub use io::format_float;
