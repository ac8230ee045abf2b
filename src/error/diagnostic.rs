//! Diagnostic formatting for semantic errors
//!
//! Renders a [`DachsError`] with its cause, location and, when the source
//! text is available, the offending line with a caret under the column
//! recorded on the tree node.

use super::{DachsError, SourceLocation};
use colored::Colorize;

/// Diagnostic information for displaying errors with context
pub struct Diagnostic {
    error: DachsError,
    source: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic from an error
    pub fn new(error: DachsError) -> Self {
        Self {
            error,
            source: None,
        }
    }

    /// Create a diagnostic with source code context
    pub fn with_source(error: DachsError, source: &str) -> Self {
        Self {
            error,
            source: Some(source.to_string()),
        }
    }

    /// The error being reported
    pub fn error(&self) -> &DachsError {
        &self.error
    }

    /// Format the diagnostic with color and context
    pub fn format(&self) -> String {
        let mut output = String::new();

        let kind = self.error.kind().red().bold();
        output.push_str(&format!("{}", kind));
        if let Some(cause) = self.error.semantic_kind() {
            output.push_str(&format!(" [{}]", cause.name().yellow()));
        }
        output.push_str(": ");
        output.push_str(self.error.message());
        output.push('\n');

        if let Some(location) = self.error.location() {
            output.push_str(&format!("  {} {}\n", "-->".blue().bold(), location));

            if let Some(ref source) = self.source {
                output.push_str(&Self::format_source_context(source, location));
            }
        }

        output
    }

    fn format_source_context(source: &str, location: &SourceLocation) -> String {
        let lines: Vec<&str> = source.lines().collect();
        if location.line == 0 || location.line > lines.len() {
            return String::new();
        }

        let line_num_width = location.line.to_string().len();
        let gutter = " ".repeat(line_num_width);
        let mut output = format!("  {} {}\n", gutter, "|".blue().bold());

        output.push_str(&format!(
            "  {} {} {}\n",
            format!("{:width$}", location.line, width = line_num_width)
                .blue()
                .bold(),
            "|".blue().bold(),
            lines[location.line - 1]
        ));

        let caret_padding = " ".repeat(location.column.saturating_sub(1));
        output.push_str(&format!(
            "  {} {} {}{}\n",
            gutter,
            "|".blue().bold(),
            caret_padding,
            "^".red().bold()
        ));

        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SemanticErrorKind;

    #[test]
    fn test_diagnostic_without_source() {
        let err = DachsError::semantic_error(
            SemanticErrorKind::NoMatchingOverload,
            "no matching overload for f(int)",
            SourceLocation::at(1, 1),
        );
        let formatted = Diagnostic::new(err).format();

        assert!(formatted.contains("Semantic Error"));
        assert!(formatted.contains("NoMatchingOverload"));
        assert!(formatted.contains("no matching overload for f(int)"));
    }

    #[test]
    fn test_diagnostic_with_source() {
        let source = "func main\n    f(1, 2)\nend";
        let err = DachsError::semantic_error(
            SemanticErrorKind::NoMatchingOverload,
            "no matching overload for f(int, int)",
            SourceLocation::at(2, 5),
        );
        let formatted = Diagnostic::with_source(err, source).format();

        assert!(formatted.contains("f(1, 2)"));
        assert!(formatted.contains('^'));
        assert!(!formatted.contains("func main"));
    }

    #[test]
    fn test_diagnostic_internal_error_has_no_context() {
        let err = DachsError::internal_error("slot written twice");
        let formatted = Diagnostic::with_source(err, "func main\nend").format();

        assert!(formatted.contains("Internal Error"));
        assert!(!formatted.contains("-->"));
    }
}
