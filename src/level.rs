//! Severity attached to a lint finding.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How findings of one lint are surfaced. Configured per lint in `[lints]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintLevel {
    /// Findings are dropped.
    Allow,
    Warn,
    /// Findings fail the run.
    #[default]
    Error,
}

impl LintLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LintLevel::Allow => "allow",
            LintLevel::Warn => "warning",
            LintLevel::Error => "error",
        }
    }

    pub fn is_enabled(self) -> bool {
        self != LintLevel::Allow
    }

    /// Whether a finding at this level makes the run exit non-zero.
    pub fn fails_run(self, deny_warnings: bool) -> bool {
        match self {
            LintLevel::Error => true,
            LintLevel::Warn => deny_warnings,
            LintLevel::Allow => false,
        }
    }
}

impl fmt::Display for LintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
