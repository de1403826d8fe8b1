//! Detection of the no-capture marker attribute on methods and parameters.
//!
//! Markers are matched by simple name, so a project may declare its own
//! `NoCaptureAttribute` in any namespace.

use crate::config::DEFAULT_MARKER_NAME;
use crate::semantic::Symbol;
use crate::syntax::simple_name;

const ATTRIBUTE_SUFFIX: &str = "Attribute";

/// Attribute names recognized as the no-capture marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSet {
    names: Vec<String>,
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self::new([DEFAULT_MARKER_NAME])
    }
}

impl MarkerSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for name in names {
            let name = normalize(name.as_ref());
            if !name.is_empty() && !normalized.iter().any(|n| n == name) {
                normalized.push(name.to_string());
            }
        }
        Self { names: normalized }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether an attribute, as written at its use site, is one of the markers.
    pub fn matches(&self, attribute: &str) -> bool {
        let attribute = normalize(attribute);
        self.names.iter().any(|name| name == attribute)
    }
}

/// `Acme.Perf.NoCaptureAttribute` and `NoCapture` both name `NoCapture`.
fn normalize(name: &str) -> &str {
    let name = simple_name(name);
    match name.strip_suffix(ATTRIBUTE_SUFFIX) {
        Some(stem) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// True iff any attribute attached to `symbol` is a marker.
pub fn has_marker(symbol: &impl Symbol, markers: &MarkerSet) -> bool {
    symbol.attributes().iter().any(|a| markers.matches(a))
}
