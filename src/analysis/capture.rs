//! Free-variable analysis for lambda expressions.

use tree_sitter::Node;

use crate::semantic::{NameBinding, SemanticModel};
use crate::syntax::{
    identifier_text, is_ancestor_or_self, is_nameof_invocation, is_reference_position,
    is_this_reference,
};

/// Name recorded when a lambda touches instance state.
pub const THIS: &str = "this";

/// Variables captured by one lambda, in first-discovery order, each listed once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureSet {
    names: Vec<String>,
}

impl CaptureSet {
    fn insert(&mut self, name: &str) {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}

/// Compute what `lambda` captures from its enclosing scopes.
///
/// A reference counts when it resolves to a local or parameter whose scope lies
/// outside `lambda`, or to instance state (`this`). References made from
/// lambdas nested inside `lambda` are included, so a nested lambda reaching past
/// `lambda` makes `lambda` capture too, while one reading `lambda`'s own
/// parameters does not.
pub fn captures<'tree>(
    lambda: Node<'tree>,
    model: &impl SemanticModel<'tree>,
    source: &str,
) -> CaptureSet {
    let mut set = CaptureSet::default();
    visit(lambda, lambda, model, source, &mut set);
    set
}

fn visit<'tree>(
    node: Node<'tree>,
    lambda: Node<'tree>,
    model: &impl SemanticModel<'tree>,
    source: &str,
    set: &mut CaptureSet,
) {
    if is_nameof_invocation(node, source) {
        return;
    }

    if is_this_reference(node) {
        set.insert(THIS);
    } else if node.kind() == "identifier" && is_reference_position(node) {
        match model.resolve_name(node) {
            Some(NameBinding::Local { scope }) if !is_ancestor_or_self(lambda, scope) => {
                set.insert(identifier_text(source, node));
            }
            Some(NameBinding::InstanceMember) => set.insert(THIS),
            _ => {}
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, lambda, model, source, set);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use crate::semantic::SourceModel;
    use crate::syntax::{is_lambda, walk};

    /// Capture names of every lambda in `src`, in pre-order.
    fn captures_of(src: &str) -> Vec<Vec<String>> {
        let tree = parse_source(src).expect("parse");
        let model = SourceModel::new(&tree, src);
        let mut lambdas = Vec::new();
        walk(tree.root_node(), &mut |n| {
            if is_lambda(n) {
                lambdas.push(n);
            }
        });
        lambdas
            .into_iter()
            .map(|l| captures(l, &model, src).into_names())
            .collect()
    }

    #[test]
    fn constant_body_captures_nothing() {
        let src = "class C { void M() => Run(() => 42); }";
        assert_eq!(captures_of(src), vec![Vec::<String>::new()]);
    }

    #[test]
    fn instance_field_is_captured_as_this() {
        let src = r#"
class C
{
    private int _field;
    private int _other;
    void M() => Run(() => _field + _other + this._field);
}
"#;
        assert_eq!(captures_of(src), vec![vec!["this"]]);
    }

    #[test]
    fn implicit_instance_call_captures_this_but_static_call_does_not() {
        let src = r#"
class C
{
    static int Shared() => 1;
    int Instance() => 2;
    void M()
    {
        Run(() => Shared());
        Run(() => Instance());
    }
}
"#;
        assert_eq!(
            captures_of(src),
            vec![Vec::<String>::new(), vec!["this".to_string()]]
        );
    }

    #[test]
    fn outer_locals_and_parameters_in_discovery_order() {
        let src = r#"
class C
{
    void M(int seed)
    {
        int offset = 3;
        Run(x => x + offset + seed + offset);
    }
}
"#;
        assert_eq!(captures_of(src), vec![vec!["offset", "seed"]]);
    }

    #[test]
    fn lambda_locals_and_parameters_are_not_captures() {
        let src = r#"
class C
{
    void M() => Run((int a, int b) => { var sum = a + b; return sum; });
}
"#;
        assert_eq!(captures_of(src), vec![Vec::<String>::new()]);
    }

    #[test]
    fn static_members_and_nameof_are_not_captures() {
        let src = r#"
class C
{
    private static int s_count;
    private const int Limit = 4;
    private int _field;
    void M() => Run(() => s_count + Limit + nameof(_field).Length);
}
"#;
        assert_eq!(captures_of(src), vec![Vec::<String>::new()]);
    }

    #[test]
    fn nested_lambda_reading_outer_lambda_parameter_is_local_to_outer() {
        let src = r#"
class C
{
    void M() => Run(x => Run(() => x));
}
"#;
        // Outer lambda first, then the nested one.
        assert_eq!(
            captures_of(src),
            vec![Vec::<String>::new(), vec!["x".to_string()]]
        );
    }

    #[test]
    fn nested_lambda_reaching_past_outer_lambda_captures_for_both() {
        let src = r#"
class C
{
    private int _field;
    void M(int seed) => Run(x => Run(() => x + seed + _field));
}
"#;
        assert_eq!(
            captures_of(src),
            vec![
                vec!["seed".to_string(), "this".to_string()],
                vec!["x".to_string(), "seed".to_string(), "this".to_string()],
            ]
        );
    }

    #[test]
    fn member_names_after_dot_are_not_captures() {
        let src = r#"
class C
{
    public int Value;
    void M() => Run((C other) => other.Value);
}
"#;
        assert_eq!(captures_of(src), vec![Vec::<String>::new()]);
    }

    #[test]
    fn initializer_member_names_are_not_captures() {
        let src = r#"
class C
{
    public int Id { get; set; }
    public int[] Items;
    void M()
    {
        Run(() => new Dto { Id = 1, Items = { 2, 3 } });
        Run((Dto r) => r with { Id = 2 });
    }
}
"#;
        assert_eq!(
            captures_of(src),
            vec![Vec::<String>::new(), Vec::<String>::new()]
        );
    }

    #[test]
    fn initializer_values_are_still_captures() {
        let src = r#"
class C
{
    public int Id { get; set; }
    void M(int seed) => Run(() => new Dto { Id = seed + Id });
}
"#;
        assert_eq!(captures_of(src), vec![vec!["seed", "this"]]);
    }

    #[test]
    fn enclosing_params_array_is_captured() {
        let src = r#"
class C
{
    int M([Tag] params int[] xs) => Run(() => xs.Length);
}
"#;
        assert_eq!(captures_of(src), vec![vec!["xs"]]);
    }
}
