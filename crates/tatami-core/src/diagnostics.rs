//! Diagnostic types produced by the format pipeline
//!
//! Diagnostics attach to regions of a single in-memory source, so they
//! carry a region index rather than a file location. A region index of
//! `-1` marks a diagnostic that could not be attached to any region.

use serde::{Deserialize, Serialize};

/// Region index used when a diagnostic is not attached to a region
pub const UNATTACHED: i32 = -1;

/// A diagnostic message produced while formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Index of the source region this diagnostic refers to (`-1` if unattached)
    pub region_index: i32,
    /// Severity level of the diagnostic
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
}

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages
    Info,
    /// Warnings that should be addressed
    Warning,
    /// Errors that must be fixed
    Error,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(region_index: i32, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            region_index,
            severity,
            message: message.into(),
        }
    }

    /// Create an informational diagnostic
    pub fn info(region_index: i32, message: impl Into<String>) -> Self {
        Self::new(region_index, Severity::Info, message)
    }

    /// Create a warning diagnostic
    pub fn warning(region_index: i32, message: impl Into<String>) -> Self {
        Self::new(region_index, Severity::Warning, message)
    }

    /// Create an error diagnostic
    pub fn error(region_index: i32, message: impl Into<String>) -> Self {
        Self::new(region_index, Severity::Error, message)
    }

    /// Check whether this diagnostic is an error
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.region_index >= 0 {
            write!(
                f,
                "{}: {} (region {})",
                self.severity, self.message, self.region_index
            )
        } else {
            write!(f, "{}: {}", self.severity, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_display() {
        let diag = Diagnostic::error(2, "HTML parse error");
        assert_eq!(diag.to_string(), "error: HTML parse error (region 2)");

        let unattached = Diagnostic::warning(UNATTACHED, "placeholder not found");
        assert_eq!(unattached.to_string(), "warning: placeholder not found");
    }

    #[test]
    fn test_is_error() {
        assert!(Diagnostic::error(0, "x").is_error());
        assert!(!Diagnostic::info(0, "x").is_error());
    }
}
