//! Parsing of `#pragma warning` directives that control lint behavior.
//!
//! - `#pragma warning disable NOCAP001` - Suppress a lint from this line on
//! - `#pragma warning restore NOCAP001` - Re-enable it
//! - `#pragma warning disable` (no ids) - Suppress every lint until a bare `restore`
//!
//! Ids may be lint codes (`NOCAP001`) or lint names (`no_capture`), and are
//! compared ASCII case-insensitively like the C# compiler does.

use std::collections::HashMap;

/// Whether a directive turns warnings off or back on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PragmaAction {
    Disable,
    Restore,
}

/// A single `#pragma warning` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PragmaDirective {
    /// 1-based line of the directive.
    pub line: usize,
    pub action: PragmaAction,
    /// Lowercased ids; empty means "all".
    pub ids: Vec<String>,
}

/// Parse every `#pragma warning` directive in `source`, in line order.
pub fn parse_pragmas(source: &str) -> Vec<PragmaDirective> {
    source
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| parse_pragma_line(line).map(|(action, ids)| (idx, action, ids)))
        .map(|(idx, action, ids)| PragmaDirective {
            line: idx + 1,
            action,
            ids,
        })
        .collect()
}

/// Parse a single directive line.
fn parse_pragma_line(line: &str) -> Option<(PragmaAction, Vec<String>)> {
    let rest = line.trim_start().strip_prefix('#')?.trim_start();
    let rest = rest.strip_prefix("pragma")?.trim_start();
    let rest = rest.strip_prefix("warning")?.trim_start();

    let (action, rest) = if let Some(rest) = rest.strip_prefix("disable") {
        (PragmaAction::Disable, rest)
    } else if let Some(rest) = rest.strip_prefix("restore") {
        (PragmaAction::Restore, rest)
    } else {
        return None;
    };

    let rest = match rest.find("//") {
        Some(idx) => &rest[..idx],
        None => rest,
    };

    let ids = rest
        .split(',')
        .map(|id| id.trim().to_ascii_lowercase())
        .filter(|id| !id.is_empty())
        .collect();

    Some((action, ids))
}

/// Warning state produced by replaying pragma directives top to bottom.
#[derive(Debug, Default, Clone)]
pub struct SuppressionScope {
    disabled_all: bool,
    overrides: HashMap<String, bool>,
}

impl SuppressionScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one directive to the running state.
    pub fn apply(&mut self, directive: &PragmaDirective) {
        let disabled = directive.action == PragmaAction::Disable;
        if directive.ids.is_empty() {
            self.disabled_all = disabled;
            self.overrides.clear();
            return;
        }
        for id in &directive.ids {
            self.overrides.insert(id.clone(), disabled);
        }
    }

    /// Check if `id` (code or lint name) is suppressed in this state.
    pub fn is_suppressed(&self, id: &str) -> bool {
        let id = id.to_ascii_lowercase();
        self.overrides
            .get(&id)
            .copied()
            .unwrap_or(self.disabled_all)
    }
}

/// All directives of one file, queryable by line.
#[derive(Debug, Default, Clone)]
pub struct PragmaMap {
    directives: Vec<PragmaDirective>,
}

impl PragmaMap {
    pub fn from_source(source: &str) -> Self {
        Self {
            directives: parse_pragmas(source),
        }
    }

    /// Warning state in effect on `row` (1-based).
    pub fn scope_at(&self, row: usize) -> SuppressionScope {
        let mut scope = SuppressionScope::new();
        for directive in self.directives.iter().take_while(|d| d.line < row) {
            scope.apply(directive);
        }
        scope
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_disable_with_ids_and_trailing_comment() {
        let pragmas = parse_pragmas("#pragma warning disable NOCAP001, CS0168 // hot path\n");
        assert_eq!(
            pragmas,
            vec![PragmaDirective {
                line: 1,
                action: PragmaAction::Disable,
                ids: vec!["nocap001".to_string(), "cs0168".to_string()],
            }]
        );
    }

    #[test]
    fn ignores_other_pragmas_and_directives() {
        let src = "#pragma checksum \"a.cs\"\n#region X\n# pragma warning restore\n";
        let pragmas = parse_pragmas(src);
        assert_eq!(pragmas.len(), 1);
        assert_eq!(pragmas[0].line, 3);
        assert_eq!(pragmas[0].action, PragmaAction::Restore);
        assert!(pragmas[0].ids.is_empty());
    }

    #[test]
    fn scope_tracks_disable_and_restore_regions() {
        let src = "\
class C {
#pragma warning disable NOCAP001
    int A;
#pragma warning restore NOCAP001
    int B;
}
";
        let map = PragmaMap::from_source(src);
        assert!(!map.scope_at(1).is_suppressed("NOCAP001"));
        assert!(map.scope_at(3).is_suppressed("NOCAP001"));
        assert!(map.scope_at(3).is_suppressed("nocap001"));
        assert!(!map.scope_at(3).is_suppressed("no_capture"));
        assert!(!map.scope_at(5).is_suppressed("NOCAP001"));
    }

    #[test]
    fn bare_disable_suppresses_everything_until_specific_restore() {
        let src = "#pragma warning disable\n#pragma warning restore no_capture\nx\n";
        let map = PragmaMap::from_source(src);
        let scope = map.scope_at(2);
        assert!(scope.is_suppressed("no_capture"));
        assert!(scope.is_suppressed("CS0001"));

        let scope = map.scope_at(3);
        assert!(!scope.is_suppressed("no_capture"));
        assert!(scope.is_suppressed("CS0001"));
    }
}
