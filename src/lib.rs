//! Static check for capturing lambdas passed to `[NoCapture]` sinks.
//!
//! The crate exposes a tree-sitter based `LintEngine` over C# sources. A
//! lambda passed to a method or parameter carrying the no-capture marker is
//! reported when it captures locals, parameters, or instance state from an
//! enclosing scope.

#![allow(clippy::new_without_default)] // LintRegistry::new() requires explicit construction

pub mod analysis;
pub mod annotations;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod level;
pub mod lint;
pub mod parser;
pub mod rules;
pub mod semantic;
pub mod suppression;
pub mod syntax;
pub mod telemetry;
pub mod visitor;

use anyhow::{Context, Result};
use std::path::Path;
use tree_sitter::Tree;

use crate::diagnostics::Diagnostic;
use crate::lint::{LintContext, LintRegistry, LintSettings};
use crate::parser::parse_source;
use crate::suppression::is_generated_source;

/// Engine orchestrates linting by parsing source and running registered rules.
pub struct LintEngine {
    registry: LintRegistry,
    settings: LintSettings,
}

impl LintEngine {
    /// Create a new engine with default lint settings.
    pub fn new(registry: LintRegistry) -> Self {
        Self {
            registry,
            settings: LintSettings::default(),
        }
    }

    /// Create a new engine with explicit lint settings (e.g. from config).
    pub fn new_with_settings(registry: LintRegistry, settings: LintSettings) -> Self {
        Self { registry, settings }
    }

    pub fn registry(&self) -> &LintRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &LintSettings {
        &self.settings
    }

    /// Lint a single in-memory source string and return diagnostics ordered by position.
    pub fn lint_source(&self, source: &str) -> Result<Vec<Diagnostic>> {
        self.lint_named_source(None, source)
    }

    /// Read and lint one file; diagnostics carry its path.
    pub fn lint_file(&self, path: &Path) -> Result<Vec<Diagnostic>> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        self.lint_named_source(Some(path), &source)
    }

    fn lint_named_source(&self, path: Option<&Path>, source: &str) -> Result<Vec<Diagnostic>> {
        if !self.settings.include_generated() && is_generated_source(path, source) {
            crate::trace_debug!(path = ?path, "skipping generated source");
            return Ok(Vec::new());
        }

        let tree = instrument_block!("parse", { parse_source(source) })?;
        let mut diagnostics = instrument_block!("analyze", { self.run_rules(source, &tree) });

        if let Some(path) = path {
            let file = path.display().to_string();
            for d in &mut diagnostics {
                d.file = Some(file.clone());
            }
        }
        Ok(diagnostics)
    }

    fn run_rules(&self, source: &str, tree: &Tree) -> Vec<Diagnostic> {
        let mut ctx = LintContext::new(source, self.settings.clone());
        let root = tree.root_node();

        for rule in self.registry.rules() {
            rule.check(root, source, &mut ctx);
        }

        ctx.into_diagnostics()
    }
}

/// Construct a `LintEngine` with every built-in lint enabled.
pub fn create_default_engine() -> LintEngine {
    LintEngine::new(LintRegistry::default_rules())
}
