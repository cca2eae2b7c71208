//! Output formatting and reporting

use colored::*;
use std::path::Path;
use tatami_core::{Diagnostic, Severity};

/// Summary statistics for a formatting run
#[derive(Debug, Clone, Default)]
pub struct FormatSummary {
    pub files_checked: usize,
    pub formatted: usize,
    pub unchanged: usize,
    pub needs_format: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl FormatSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn record_diagnostics(&mut self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            match diagnostic.severity {
                Severity::Error => self.errors += 1,
                Severity::Warning => self.warnings += 1,
                Severity::Info => {}
            }
        }
    }
}

/// Print diagnostics for one file to stderr
pub fn print_diagnostics(path: &Path, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        let severity = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue(),
        };
        eprintln!("{}: {}: {}", path.display(), severity, diagnostic.message);
    }
}

/// Print the run summary to stderr
pub fn print_summary(summary: &FormatSummary, check: bool, write: bool) {
    let mut parts = vec![format!("{} file(s) processed", summary.files_checked)];

    if check {
        parts.push(format!("{} need formatting", summary.needs_format));
    } else if write {
        parts.push(format!("{} formatted", summary.formatted));
        parts.push(format!("{} unchanged", summary.unchanged));
    }
    if summary.errors > 0 {
        parts.push(format!("{}", format!("{} error(s)", summary.errors).red()));
    }
    if summary.warnings > 0 {
        parts.push(format!(
            "{}",
            format!("{} warning(s)", summary.warnings).yellow()
        ));
    }

    eprintln!("{}", parts.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tatami_core::UNATTACHED;

    #[test]
    fn test_record_diagnostics() {
        let mut summary = FormatSummary::new();
        summary.record_diagnostics(&[
            Diagnostic::error(0, "bad"),
            Diagnostic::warning(1, "meh"),
            Diagnostic::info(UNATTACHED, "fyi"),
        ]);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.warnings, 1);
        assert!(summary.has_errors());
    }
}
