//! Result type alias used throughout the crate

use crate::error::TatamiError;

/// Result type for template formatting operations
pub type Result<T> = std::result::Result<T, TatamiError>;
