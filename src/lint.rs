use crate::analysis::MarkerSet;
use crate::annotations::PragmaMap;
use crate::config::NoCaptureConfig;
use crate::diagnostics::{Diagnostic, Span};
use crate::error::NoCaptureResult;
use crate::level::LintLevel;
use crate::no_capture_bail;
use crate::suppression::is_suppressed_at;
use std::collections::{HashMap, HashSet};
use tree_sitter::Node;

// ============================================================================
// Lint Categories
// ============================================================================

/// High-level categories used to group lints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LintCategory {
    /// Code that allocates or does hidden work on a path marked as hot.
    Performance,
}

impl LintCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LintCategory::Performance => "performance",
        }
    }
}

/// Static metadata describing a lint rule.
#[derive(Debug)]
pub struct LintDescriptor {
    pub name: &'static str,
    /// Diagnostic id, also accepted by `#pragma warning`.
    pub code: &'static str,
    pub category: LintCategory,
    pub description: &'static str,
    /// Level used when config says nothing about this lint.
    pub default_level: LintLevel,
}

/// A single lint rule that can inspect a syntax tree.
pub trait LintRule: Send + Sync {
    fn descriptor(&self) -> &'static LintDescriptor;
    fn check(&self, root: Node, source: &str, ctx: &mut LintContext<'_>);
}

/// Built-in lint descriptors.
pub fn builtin_descriptors() -> [&'static LintDescriptor; 1] {
    [&crate::rules::NO_CAPTURE]
}

/// Resolve a lint name or code (`no_capture`, `NOCAP001`) to its canonical name.
///
/// Unknown names are returned unchanged.
pub fn resolve_lint_alias(name: &str) -> &str {
    builtin_descriptors()
        .into_iter()
        .find(|d| d.code.eq_ignore_ascii_case(name))
        .map_or(name, |d| d.name)
}

/// Get all known lint names including codes.
pub fn all_known_lints_with_aliases() -> HashSet<&'static str> {
    builtin_descriptors()
        .into_iter()
        .flat_map(|d| [d.name, d.code])
        .collect()
}

pub fn all_known_lints() -> HashSet<&'static str> {
    builtin_descriptors().into_iter().map(|d| d.name).collect()
}

fn is_known_lint(name: &str) -> bool {
    all_known_lints_with_aliases()
        .iter()
        .any(|known| known.eq_ignore_ascii_case(name))
}

/// Per-lint configuration derived from `no-capture.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintSettings {
    levels: HashMap<String, LintLevel>,
    markers: MarkerSet,
    include_generated: bool,
}

impl LintSettings {
    /// Settings described by a loaded config file.
    pub fn from_config(cfg: &NoCaptureConfig) -> Self {
        Self::default()
            .with_config_levels(cfg.lints.levels.clone())
            .disable(cfg.lints.disabled.iter().cloned())
            .with_markers(MarkerSet::new(&cfg.markers.names))
            .with_include_generated(cfg.analysis.include_generated)
    }

    #[must_use]
    pub fn with_config_levels(mut self, levels: HashMap<String, LintLevel>) -> Self {
        for (name, level) in levels {
            let canonical = resolve_lint_alias(&name);
            self.levels.insert(canonical.to_string(), level);
        }
        self
    }

    #[must_use]
    pub fn disable(mut self, disabled: impl IntoIterator<Item = String>) -> Self {
        for name in disabled {
            let canonical = resolve_lint_alias(&name);
            self.levels.insert(canonical.to_string(), LintLevel::Allow);
        }
        self
    }

    #[must_use]
    pub fn with_markers(mut self, markers: MarkerSet) -> Self {
        self.markers = markers;
        self
    }

    #[must_use]
    pub fn with_include_generated(mut self, include_generated: bool) -> Self {
        self.include_generated = include_generated;
        self
    }

    pub fn level_for(&self, lint: &LintDescriptor) -> LintLevel {
        self.levels
            .get(lint.name)
            .copied()
            .unwrap_or(lint.default_level)
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn include_generated(&self) -> bool {
        self.include_generated
    }
}

/// Mutable context passed to lint rules while traversing a file.
pub struct LintContext<'src> {
    source: &'src str,
    settings: LintSettings,
    diagnostics: Vec<Diagnostic>,
    pragmas: PragmaMap,
}

impl<'src> LintContext<'src> {
    pub fn new(source: &'src str, settings: LintSettings) -> Self {
        Self {
            source,
            settings,
            diagnostics: Vec::new(),
            pragmas: PragmaMap::from_source(source),
        }
    }

    /// Report a finding at `span`, honoring configured levels and pragma suppression.
    pub fn report(&mut self, lint: &'static LintDescriptor, span: Span, message: impl Into<String>) {
        let level = self.settings.level_for(lint);
        if !level.is_enabled() {
            return;
        }
        if is_suppressed_at(&self.pragmas, span.start.row, lint) {
            return;
        }

        self.diagnostics.push(Diagnostic {
            lint,
            level,
            file: None,
            span,
            message: message.into(),
        });
    }

    pub fn report_node(&mut self, lint: &'static LintDescriptor, node: Node, message: impl Into<String>) {
        self.report(lint, Span::from_range(node.range()), message);
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn settings(&self) -> &LintSettings {
        &self.settings
    }

    /// Diagnostics ordered by start position.
    #[must_use]
    pub fn into_diagnostics(mut self) -> Vec<Diagnostic> {
        self.diagnostics
            .sort_by_key(|d| (d.span.start, d.span.end, d.lint.name));
        self.diagnostics
    }
}

/// Registry of lint rules run by the engine.
pub struct LintRegistry {
    rules: Vec<Box<dyn LintRule>>,
}

impl Default for LintRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LintRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    #[must_use]
    pub fn with_rule(mut self, rule: impl LintRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rules(&self) -> impl Iterator<Item = &Box<dyn LintRule>> {
        self.rules.iter()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &'static LintDescriptor> + '_ {
        self.rules.iter().map(|r| r.descriptor())
    }

    pub fn find_descriptor(&self, name: &str) -> Option<&'static LintDescriptor> {
        let name = resolve_lint_alias(name);
        self.descriptors().find(|d| d.name == name)
    }

    #[must_use = "registry should be used to create an engine"]
    pub fn default_rules() -> Self {
        Self::new().with_rule(crate::rules::NoCaptureLint)
    }

    /// Filter the built-in rules.
    ///
    /// # Errors
    ///
    /// Returns error if any lint name in `only`, `skip`, or `disabled` is unknown.
    pub fn default_rules_filtered(
        only: &[String],
        skip: &[String],
        disabled: &[String],
    ) -> NoCaptureResult<Self> {
        for n in only.iter().chain(skip.iter()).chain(disabled.iter()) {
            if !is_known_lint(n) {
                no_capture_bail!("unknown lint: {n}");
            }
        }

        let only_set: Option<HashSet<&str>> = if only.is_empty() {
            None
        } else {
            Some(only.iter().map(|s| resolve_lint_alias(s)).collect())
        };
        let excluded: HashSet<&str> = skip
            .iter()
            .chain(disabled.iter())
            .map(|s| resolve_lint_alias(s))
            .collect();

        let mut reg = Self::new();
        for rule in Self::default_rules().rules {
            let name = rule.descriptor().name;
            if let Some(ref only) = only_set
                && !only.contains(name)
            {
                continue;
            }
            if excluded.contains(name) {
                continue;
            }
            reg.rules.push(rule);
        }

        Ok(reg)
    }
}
