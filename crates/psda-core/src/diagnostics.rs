//! Warnings collected while loading the registry and seeding sources.
//!
//! Seeding is a best-effort bulk load: a missing source file, a skipped empty
//! cell or a gap in the topology levels does not stop the run, but the caller
//! should still hear about it. Those conditions are recorded here and returned
//! with the seed report. Fatal conditions are [`crate::GridError`]s instead.
//!
//! # Example
//!
//! ```
//! use psda_core::diagnostics::Diagnostics;
//!
//! let mut diag = Diagnostics::new();
//! diag.warn("source", "directory not found", "ENTSOE");
//! diag.warn("registry", "topology levels are not contiguous", "GENERATION_UNIT");
//!
//! assert_eq!(diag.len(), 2);
//! assert_eq!(diag.summary(), "2 warnings");
//! ```

use serde::Serialize;
use std::fmt;

/// One non-fatal problem, tied to the thing it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticIssue {
    /// Where it came from: "source", "registry", "melt", ...
    pub category: String,
    /// Resource id, file name or fuel column the message is about
    pub subject: String,
    pub message: String,
}

impl fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.category, self.subject, self.message)
    }
}

/// Ordered list of warnings for one registry load or seeding run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    pub issues: Vec<DiagnosticIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, category: &str, message: &str, subject: &str) {
        self.issues.push(DiagnosticIssue {
            category: category.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.issues.extend(other.issues);
    }

    pub fn summary(&self) -> String {
        match self.issues.len() {
            0 => "no warnings".to_string(),
            1 => "1 warning".to_string(),
            n => format!("{n} warnings"),
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for issue in &self.issues {
            writeln!(f, "  {issue}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let mut diag = Diagnostics::new();
        diag.warn("melt", "empty cell skipped at line 4", "solar");
        assert_eq!(
            diag.issues[0].to_string(),
            "[melt] solar: empty cell skipped at line 4"
        );
    }

    #[test]
    fn test_summary_and_merge() {
        let mut a = Diagnostics::new();
        assert_eq!(a.summary(), "no warnings");
        a.warn("source", "file not found", "EIA/demand.csv");
        assert_eq!(a.summary(), "1 warning");

        let mut b = Diagnostics::new();
        b.warn("registry", "duplicate fuel type", "solar");
        a.merge(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.issues[1].category, "registry");
    }

    #[test]
    fn test_serializes_as_a_list() {
        let mut diag = Diagnostics::new();
        diag.warn("source", "skipped", "ELEXON");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json[0]["subject"], "ELEXON");
        assert_eq!(json[0]["category"], "source");
    }
}
