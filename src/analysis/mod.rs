//! Capture-compliance checks for lambdas passed to no-capture sinks.
//!
//! Each lambda is checked on its own: bind it to a call-site parameter, stop
//! unless the method or parameter carries a marker, then compute its
//! captures and report them. Nested lambdas go through the same pipeline
//! independently of the lambda that contains them.

pub mod binder;
pub mod capture;
pub mod marker;
pub mod report;

use tree_sitter::Node;

use crate::semantic::SemanticModel;
use crate::visitor::{CSharpVisitor, walk_tree};

pub use binder::{ArgumentSite, CallBinding, bind};
pub use capture::{CaptureSet, THIS, captures};
pub use marker::{MarkerSet, has_marker};
pub use report::{VIOLATION_PHRASE, Violation, is_marked, report};

/// Run the full pipeline for one lambda node.
pub fn check_lambda<'tree>(
    lambda: Node<'tree>,
    model: &impl SemanticModel<'tree>,
    markers: &MarkerSet,
    source: &str,
) -> Option<Violation> {
    let binding = bind(lambda, model, source)?;
    if !is_marked(&binding, markers) {
        return None;
    }
    let captured = captures(lambda, model, source);
    if captured.is_empty() {
        crate::trace_debug!(method = %binding.method.name, "marked sink receives a capture-free lambda");
        return None;
    }
    report(&binding, captured, markers)
}

/// A violation together with the lambda it was found on.
#[derive(Debug, Clone)]
pub struct Finding<'tree> {
    pub lambda: Node<'tree>,
    pub violation: Violation,
}

struct LambdaChecker<'a, 'tree, M> {
    model: &'a M,
    markers: &'a MarkerSet,
    source: &'a str,
    findings: Vec<Finding<'tree>>,
}

impl<'tree, M: SemanticModel<'tree>> CSharpVisitor<'tree> for LambdaChecker<'_, 'tree, M> {
    fn visit_lambda(&mut self, lambda: Node<'tree>) {
        if let Some(violation) = check_lambda(lambda, self.model, self.markers, self.source) {
            self.findings.push(Finding { lambda, violation });
        }
    }
}

/// Check every lambda under `root`, outer lambdas before the ones nested in them.
pub fn find_violations<'tree>(
    root: Node<'tree>,
    model: &impl SemanticModel<'tree>,
    markers: &MarkerSet,
    source: &str,
) -> Vec<Finding<'tree>> {
    let mut checker = LambdaChecker {
        model,
        markers,
        source,
        findings: Vec::new(),
    };
    walk_tree(root, &mut checker);
    checker.findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use crate::semantic::SourceModel;

    fn violations(src: &str) -> Vec<String> {
        let tree = parse_source(src).expect("parse");
        let model = SourceModel::new(&tree, src);
        find_violations(tree.root_node(), &model, &MarkerSet::default(), src)
            .into_iter()
            .map(|f| f.violation.to_string())
            .collect()
    }

    #[test]
    fn params_items_are_checked_one_by_one() {
        let src = r#"
class C
{
    private int _field;
    void CallSite() => Invoke(1, x => x * 2, x => x + _field);
    T Invoke<T>(T initialValue, [NoCapture] params Func<T, T>[] transforms) => initialValue;
}
"#;
        assert_eq!(
            violations(src),
            vec!["Invoke( transforms ) requires a non-capturing lambda. Captured variables: this."]
        );
    }

    #[test]
    fn unmarked_params_never_report() {
        let src = r#"
class C
{
    private int _field;
    void CallSite() => Invoke(1, x => x + _field, x => x - _field);
    T Invoke<T>(T initialValue, params Func<T, T>[] transforms) => initialValue;
}
"#;
        assert!(violations(src).is_empty());
    }

    #[test]
    fn findings_keep_the_offending_lambda() {
        let src = r#"
class C
{
    void CallSite(int seed) => Invoke(() => seed);
    T Invoke<T>([NoCapture] Func<T> func) => func();
}
"#;
        let tree = parse_source(src).expect("parse");
        let model = SourceModel::new(&tree, src);
        let findings = find_violations(tree.root_node(), &model, &MarkerSet::default(), src);
        assert_eq!(findings.len(), 1);
        assert_eq!(crate::syntax::slice(src, findings[0].lambda), "() => seed");
        assert_eq!(findings[0].violation.captured, vec!["seed"]);
    }

    #[test]
    fn custom_marker_names_are_honored() {
        let src = r#"
class C
{
    private int _field;
    void CallSite() => Invoke(() => _field);
    [HotPath] T Invoke<T>(Func<T> func) => func();
}
"#;
        let tree = parse_source(src).expect("parse");
        let model = SourceModel::new(&tree, src);
        let root = tree.root_node();
        assert!(find_violations(root, &model, &MarkerSet::default(), src).is_empty());
        let hot_path = MarkerSet::new(["HotPathAttribute"]);
        assert_eq!(find_violations(root, &model, &hot_path, src).len(), 1);
    }
}
