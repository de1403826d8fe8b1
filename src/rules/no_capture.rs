use crate::analysis::find_violations;
use crate::level::LintLevel;
use crate::lint::{LintCategory, LintContext, LintDescriptor, LintRule};
use crate::semantic::SourceModel;
use tree_sitter::Node;

// ============================================================================
// NoCaptureLint
// ============================================================================

pub struct NoCaptureLint;

pub static NO_CAPTURE: LintDescriptor = LintDescriptor {
    name: "no_capture",
    code: "NOCAP001",
    category: LintCategory::Performance,
    description: "Lambdas passed to a [NoCapture] method or parameter must not capture variables",
    default_level: LintLevel::Error,
};

impl LintRule for NoCaptureLint {
    fn descriptor(&self) -> &'static LintDescriptor {
        &NO_CAPTURE
    }

    fn check(&self, root: Node, source: &str, ctx: &mut LintContext<'_>) {
        let model = SourceModel::from_root(root, source);
        let markers = ctx.settings().markers().clone();

        for finding in find_violations(root, &model, &markers, source) {
            ctx.report_node(&NO_CAPTURE, finding.lambda, finding.violation.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::LintSettings;
    use crate::parser::parse_source;

    fn run(src: &str, settings: LintSettings) -> Vec<String> {
        let tree = parse_source(src).expect("parse");
        let mut ctx = LintContext::new(src, settings);
        NoCaptureLint.check(tree.root_node(), src, &mut ctx);
        ctx.into_diagnostics()
            .into_iter()
            .map(|d| format!("{}:{} {}", d.span.start.row, d.span.start.column, d.message))
            .collect()
    }

    const SRC: &str = r#"class C
{
    private int _field;
    void CallSite() => Invoke(() => _field);
    [NoCapture] T Invoke<T>(Func<T> func) => func();
}
"#;

    #[test]
    fn reports_at_the_lambda() {
        assert_eq!(
            run(SRC, LintSettings::default()),
            vec!["4:31 Invoke( func ) requires a non-capturing lambda. Captured variables: this."]
        );
    }

    #[test]
    fn disabled_lint_reports_nothing() {
        let settings = LintSettings::default().disable(["no_capture".to_string()]);
        assert!(run(SRC, settings).is_empty());
    }
}
