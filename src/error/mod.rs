//! Error handling and diagnostics for the Dachs front end
//!
//! This module provides the error types raised by semantic analysis and
//! the diagnostic formatting used to report them.

use std::fmt;

use thiserror::Error;

pub mod diagnostic;

pub use diagnostic::Diagnostic;

/// Result type alias for Dachs operations
pub type DachsResult<T> = Result<T, DachsError>;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Optional filename
    pub filename: Option<String>,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize, filename: Option<String>) -> Self {
        Self {
            line,
            column,
            filename,
        }
    }

    /// Create a source location without a filename
    pub fn at(line: usize, column: usize) -> Self {
        Self::new(line, column, None)
    }

    /// Same position, attributed to `filename` unless a file is already recorded
    pub fn in_file(&self, filename: Option<&str>) -> Self {
        match (&self.filename, filename) {
            (None, Some(name)) => Self::new(self.line, self.column, Some(name.to_string())),
            _ => self.clone(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref filename) = self.filename {
            write!(f, "{}:{}:{}", filename, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// What a semantic error is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticErrorKind {
    /// No function definition accepts the argument types of a call
    NoMatchingOverload,
    /// A function or class collides with an earlier definition
    DuplicateDefinition,
    /// A resolution slot was still empty after analysis
    UnresolvedSlot,
    /// A type annotation names no builtin or class
    UnknownType,
    /// A name is used without being declared
    UndefinedVariable,
    /// Two types that must agree do not
    TypeMismatch,
    /// A type could not be determined from the program
    NotInferable,
    /// Assignment to a binding declared without `var`
    ImmutableAssignment,
}

impl SemanticErrorKind {
    /// Short name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            Self::NoMatchingOverload => "NoMatchingOverload",
            Self::DuplicateDefinition => "DuplicateDefinition",
            Self::UnresolvedSlot => "UnresolvedSlot",
            Self::UnknownType => "UnknownType",
            Self::UndefinedVariable => "UndefinedVariable",
            Self::TypeMismatch => "TypeMismatch",
            Self::NotInferable => "NotInferable",
            Self::ImmutableAssignment => "ImmutableAssignment",
        }
    }
}

impl fmt::Display for SemanticErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Main error type for the Dachs front end
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DachsError {
    /// Semantic analysis error, reported against the offending node
    #[error("Semantic Error: {message} at {location}")]
    Semantic {
        kind: SemanticErrorKind,
        message: String,
        location: SourceLocation,
    },
    /// Internal compiler error (should not happen in normal operation)
    #[error("Internal Error: {message}")]
    Internal { message: String },
}

impl DachsError {
    /// Create a new semantic error
    pub fn semantic_error(
        kind: SemanticErrorKind,
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self::Semantic {
            kind,
            message: message.into(),
            location,
        }
    }

    /// Create a new internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the error kind as a string
    pub fn kind(&self) -> &str {
        match self {
            Self::Semantic { .. } => "Semantic Error",
            Self::Internal { .. } => "Internal Error",
        }
    }

    /// The semantic cause, if this is a semantic error
    pub fn semantic_kind(&self) -> Option<SemanticErrorKind> {
        match self {
            Self::Semantic { kind, .. } => Some(*kind),
            Self::Internal { .. } => None,
        }
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        match self {
            Self::Semantic { message, .. } | Self::Internal { message } => message,
        }
    }

    /// Get the source location if available
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Semantic { location, .. } => Some(location),
            Self::Internal { .. } => None,
        }
    }

    /// Attach a filename to the location of a semantic error
    pub fn with_filename(self, filename: Option<&str>) -> Self {
        match self {
            Self::Semantic {
                kind,
                message,
                location,
            } => Self::Semantic {
                kind,
                message,
                location: location.in_file(filename),
            },
            internal => internal,
        }
    }
}
