//! Violation records and the diagnostic message they render to.

use std::fmt;

use itertools::Itertools;

use super::binder::CallBinding;
use super::capture::CaptureSet;
use super::marker::{MarkerSet, has_marker};

pub const VIOLATION_PHRASE: &str = "requires a non-capturing lambda";

/// A capturing lambda passed where captures are forbidden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub callee: String,
    pub parameter: String,
    pub captured: Vec<String>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}( {} ) {}. Captured variables: {}.",
            self.callee,
            self.parameter,
            VIOLATION_PHRASE,
            self.captured.iter().join(",")
        )
    }
}

/// Whether the method or the bound parameter carries a marker.
pub fn is_marked(binding: &CallBinding<'_>, markers: &MarkerSet) -> bool {
    has_marker(&binding.method, markers)
        || binding
            .parameter
            .as_ref()
            .is_some_and(|p| has_marker(p, markers))
}

/// Combine a binding with the lambda's captures.
///
/// Nothing is reported without a bound parameter, without a marker, or when
/// the capture set is empty.
pub fn report(
    binding: &CallBinding<'_>,
    captures: CaptureSet,
    markers: &MarkerSet,
) -> Option<Violation> {
    let parameter = binding.parameter.as_ref()?;
    if captures.is_empty() || !is_marked(binding, markers) {
        return None;
    }
    Some(Violation {
        callee: binding.method.name.clone(),
        parameter: parameter.name.clone(),
        captured: captures.into_names(),
    })
}
