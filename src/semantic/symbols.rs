//! Symbols built from C# declarations: methods, their parameters, and type members.

use tree_sitter::Node;

use crate::syntax::{
    FIELD_DECLARATION_KINDS, ParameterSyntax, argument_label, argument_list, arguments,
    attribute_list_names, attribute_names, has_modifier, identifier_text, modifiers,
    parameter_syntax, simple_name, slice,
};

/// Identity of a declaration (the tree-sitter id of its declaring node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub usize);

impl SymbolId {
    pub fn of(node: Node) -> Self {
        Self(node.id())
    }
}

/// Anything attributes can be attached to.
pub trait Symbol {
    fn id(&self) -> SymbolId;
    fn name(&self) -> &str;
    /// Simple names of the attached attributes, in declaration order.
    fn attributes(&self) -> &[String];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSymbol {
    pub id: SymbolId,
    pub name: String,
    /// Position in the owning method's parameter list as seen by the call site.
    pub ordinal: usize,
    pub attributes: Vec<String>,
    /// Trailing `params` array.
    pub is_params: bool,
    /// Receiver of an extension method.
    pub is_this: bool,
    pub has_default: bool,
}

impl ParameterSymbol {
    /// Build from one entry of a `parameter_list`.
    pub(crate) fn from_syntax(param: &ParameterSyntax, ordinal: usize, source: &str) -> Option<Self> {
        let name = param.name()?;
        let symbol = match param {
            ParameterSyntax::Single(node) => {
                let mods = modifiers(*node, source);
                let mut cursor = node.walk();
                let has_default = node
                    .children(&mut cursor)
                    .any(|c| c.kind() == "equals_value_clause" || c.kind() == "=");
                Self {
                    id: SymbolId::of(*node),
                    name: identifier_text(source, name).to_string(),
                    ordinal,
                    attributes: attribute_names(*node, source),
                    is_params: node.kind() == "parameter_array" || mods.contains(&"params"),
                    is_this: mods.contains(&"this"),
                    has_default,
                }
            }
            ParameterSyntax::Params { attributes, .. } => Self {
                id: SymbolId::of(name),
                name: identifier_text(source, name).to_string(),
                ordinal,
                attributes: attribute_list_names(attributes, source),
                is_params: true,
                is_this: false,
                has_default: false,
            },
        };
        Some(symbol)
    }
}

impl Symbol for ParameterSymbol {
    fn id(&self) -> SymbolId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[String] {
        &self.attributes
    }
}

/// Parameters declared by a `parameter_list` node, in order.
pub(crate) fn parameters_of(list: Node, source: &str) -> Vec<ParameterSymbol> {
    parameter_syntax(list)
        .iter()
        .enumerate()
        .filter_map(|(ordinal, p)| ParameterSymbol::from_syntax(p, ordinal, source))
        .collect()
}

pub(crate) fn parameter_list_of(node: Node<'_>) -> Option<Node<'_>> {
    node.child_by_field_name("parameters").or_else(|| {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .find(|c| c.kind() == "parameter_list")
    })
}

/// Shape of the argument list at a call site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentShape {
    /// Label of each argument (`name:`), `None` for positional ones.
    pub names: Vec<Option<String>>,
}

impl ArgumentShape {
    pub fn from_invocation(invocation: Node, source: &str) -> Self {
        let names = argument_list(invocation)
            .map(arguments)
            .unwrap_or_default()
            .into_iter()
            .map(|arg| argument_label(arg, source).map(str::to_string))
            .collect();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSymbol {
    pub id: SymbolId,
    pub name: String,
    /// Declaring type, `None` for local functions.
    pub containing_type: Option<String>,
    pub parameters: Vec<ParameterSymbol>,
    pub attributes: Vec<String>,
    pub is_static: bool,
    /// Extension method presented with its receiver parameter removed.
    pub is_reduced: bool,
}

impl MethodSymbol {
    /// Build from a `method_declaration` or `local_function_statement` node.
    pub(crate) fn from_declaration(
        node: Node,
        source: &str,
        containing_type: Option<&str>,
    ) -> Option<Self> {
        let name = node.child_by_field_name("name")?;
        let parameters = parameter_list_of(node)
            .map(|list| parameters_of(list, source))
            .unwrap_or_default();

        Some(Self {
            id: SymbolId::of(node),
            name: identifier_text(source, name).to_string(),
            containing_type: containing_type.map(str::to_string),
            parameters,
            attributes: attribute_names(node, source),
            is_static: has_modifier(node, source, "static"),
            is_reduced: false,
        })
    }

    pub fn is_extension(&self) -> bool {
        !self.is_reduced && self.parameters.first().is_some_and(|p| p.is_this)
    }

    /// The form an extension method takes when invoked on a receiver (`x.M(...)`):
    /// the `this` parameter is dropped and the remaining ordinals shift down by one.
    pub fn reduced(&self) -> Option<Self> {
        if !self.is_extension() {
            return None;
        }
        let parameters = self.parameters[1..]
            .iter()
            .cloned()
            .map(|mut p| {
                p.ordinal -= 1;
                p
            })
            .collect();
        Some(Self {
            parameters,
            is_reduced: true,
            ..self.clone()
        })
    }

    pub fn parameter_named(&self, name: &str) -> Option<&ParameterSymbol> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// The trailing `params` parameter, if any.
    pub fn variadic_parameter(&self) -> Option<&ParameterSymbol> {
        self.parameters.last().filter(|p| p.is_params)
    }

    /// Whether a call with `shape` could bind to this method, judged by arity and names only.
    pub fn is_applicable(&self, shape: &ArgumentShape) -> bool {
        let variadic = self.variadic_parameter().is_some();
        if !variadic && shape.len() > self.parameters.len() {
            return false;
        }

        let all_names_known = shape
            .names
            .iter()
            .flatten()
            .all(|name| self.parameter_named(name).is_some());
        if !all_names_known {
            return false;
        }

        let required = self
            .parameters
            .iter()
            .filter(|p| !p.has_default && !p.is_params)
            .count();
        shape.len() >= required
    }
}

impl Symbol for MethodSymbol {
    fn id(&self) -> SymbolId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[String] {
        &self.attributes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Property,
    Event,
    Method,
}

/// A named member of a type, as seen by unqualified lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSymbol {
    pub name: String,
    pub kind: MemberKind,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSymbol {
    pub id: SymbolId,
    pub name: String,
    /// Simple names from the base list.
    pub bases: Vec<String>,
    pub members: Vec<MemberSymbol>,
    pub methods: Vec<MethodSymbol>,
}

impl TypeSymbol {
    /// Build from a class/struct/record/interface declaration.
    pub(crate) fn from_declaration(node: Node, source: &str) -> Option<Self> {
        let name = identifier_text(source, node.child_by_field_name("name")?).to_string();
        let mut ty = Self {
            id: SymbolId::of(node),
            name,
            bases: Vec::new(),
            members: Vec::new(),
            methods: Vec::new(),
        };

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "base_list" => {
                    let mut base_cursor = child.walk();
                    ty.bases.extend(
                        child
                            .named_children(&mut base_cursor)
                            .map(|b| simple_name(slice(source, b)).to_string())
                            .filter(|b| !b.is_empty()),
                    );
                }
                // Primary constructor parameters are stored as instance state.
                "parameter_list" => {
                    for p in parameters_of(child, source) {
                        ty.push_member(p.name, MemberKind::Property, false);
                    }
                }
                _ => {}
            }
        }

        let body = node.child_by_field_name("body").or_else(|| {
            let mut cursor = node.walk();
            node.named_children(&mut cursor)
                .find(|c| c.kind() == "declaration_list")
        });
        if let Some(body) = body {
            ty.collect_members(body, source);
        }
        Some(ty)
    }

    fn push_member(&mut self, name: String, kind: MemberKind, is_static: bool) {
        self.members.push(MemberSymbol {
            name,
            kind,
            is_static,
        });
    }

    fn collect_members(&mut self, body: Node, source: &str) {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            let is_static =
                has_modifier(member, source, "static") || has_modifier(member, source, "const");
            match member.kind() {
                kind if FIELD_DECLARATION_KINDS.contains(&kind) => {
                    let kind = if kind == "event_field_declaration" {
                        MemberKind::Event
                    } else {
                        MemberKind::Field
                    };
                    for name in declarator_names(member, source) {
                        self.push_member(name, kind, is_static);
                    }
                }
                "property_declaration" | "event_declaration" => {
                    let kind = if member.kind() == "event_declaration" {
                        MemberKind::Event
                    } else {
                        MemberKind::Property
                    };
                    if let Some(name) = member.child_by_field_name("name") {
                        self.push_member(identifier_text(source, name).to_string(), kind, is_static);
                    }
                }
                "method_declaration" => {
                    if let Some(method) = MethodSymbol::from_declaration(member, source, Some(&self.name)) {
                        self.push_member(method.name.clone(), MemberKind::Method, method.is_static);
                        self.methods.push(method);
                    }
                }
                _ => {}
            }
        }
    }

    pub fn member(&self, name: &str) -> Option<&MemberSymbol> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Names declared by a field declaration's `variable_declarator`s.
fn declarator_names(field: Node, source: &str) -> Vec<String> {
    let mut out = Vec::new();
    crate::syntax::walk(field, &mut |n| {
        if n.kind() != "variable_declarator" {
            return;
        }
        let name = n.child_by_field_name("name").or_else(|| n.named_child(0));
        if let Some(name) = name.filter(|name| name.kind() == "identifier") {
            out.push(identifier_text(source, name).to_string());
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use crate::syntax::walk;

    fn methods_in(src: &str) -> Vec<MethodSymbol> {
        let tree = parse_source(src).expect("parse");
        let mut out = Vec::new();
        walk(tree.root_node(), &mut |n| {
            if n.kind() == "method_declaration"
                && let Some(m) = MethodSymbol::from_declaration(n, src, Some("X"))
            {
                out.push(m);
            }
        });
        out
    }

    fn shape(names: &[Option<&str>]) -> ArgumentShape {
        ArgumentShape {
            names: names.iter().map(|n| n.map(str::to_string)).collect(),
        }
    }

    #[test]
    fn extension_method_parameters_and_reduction() {
        let src = r#"
static class X
{
    public static T Select<T>(this T value, [NoCapture] Func<T, T> selector) => selector(value);
}
"#;
        let methods = methods_in(src);
        assert_eq!(methods.len(), 1);
        let select = &methods[0];
        assert_eq!(select.name, "Select");
        assert!(select.is_static);
        assert!(select.is_extension());
        assert_eq!(select.parameters[0].name, "value");
        assert!(select.parameters[0].is_this);
        assert_eq!(select.parameters[1].attributes, vec!["NoCapture"]);

        let reduced = select.reduced().expect("extension reduces");
        assert!(reduced.is_reduced);
        assert!(!reduced.is_extension());
        assert_eq!(reduced.parameters.len(), 1);
        assert_eq!(reduced.parameters[0].name, "selector");
        assert_eq!(reduced.parameters[0].ordinal, 0);
        assert!(reduced.reduced().is_none());
    }

    #[test]
    fn params_array_is_variadic() {
        let src = r#"
class X
{
    T Invoke<T>(T initialValue, [NoCapture] params Func<T, T>[] transforms) => initialValue;
}
"#;
        let methods = methods_in(src);
        let invoke = &methods[0];
        let variadic = invoke.variadic_parameter().expect("params parameter");
        assert_eq!(variadic.name, "transforms");
        assert_eq!(variadic.ordinal, 1);
        assert_eq!(variadic.attributes, vec!["NoCapture"]);
        assert!(!invoke.is_extension());
    }

    #[test]
    fn applicability_counts_required_optional_and_params() {
        let src = r#"
class X
{
    void Two(int seed, Func<int> func) {}
    void Optional(Func<int> func, int retries = 3) {}
    void Many(int first, params Func<int>[] rest) {}
}
"#;
        let methods = methods_in(src);
        let two = &methods[0];
        let optional = &methods[1];
        let many = &methods[2];

        assert!(two.is_applicable(&shape(&[None, None])));
        assert!(two.is_applicable(&shape(&[Some("func"), Some("seed")])));
        assert!(!two.is_applicable(&shape(&[None])));
        assert!(!two.is_applicable(&shape(&[None, None, None])));
        assert!(!two.is_applicable(&shape(&[Some("fn"), Some("seed")])));

        assert!(optional.is_applicable(&shape(&[None])));
        assert!(optional.is_applicable(&shape(&[None, None])));
        assert!(optional.parameters[1].has_default);

        assert!(many.is_applicable(&shape(&[None])));
        assert!(many.is_applicable(&shape(&[None, None, None, None])));
        assert!(!many.is_applicable(&shape(&[])));
    }

    #[test]
    fn type_members_record_static_and_instance_state() {
        let src = r#"
class C : Base, IDisposable
{
    private readonly int _field = 42, _other;
    private static int s_counter;
    private const int Limit = 3;
    public int Value { get; set; }
    public event Action Changed;
    int Instance() => _field;
    static int Shared() => 1;
}
"#;
        let tree = parse_source(src).expect("parse");
        let mut ty = None;
        walk(tree.root_node(), &mut |n| {
            if n.kind() == "class_declaration" {
                ty = TypeSymbol::from_declaration(n, src);
            }
        });
        let ty = ty.expect("type symbol");

        assert_eq!(ty.name, "C");
        assert_eq!(ty.bases, vec!["Base", "IDisposable"]);
        assert!(!ty.member("_field").expect("_field").is_static);
        assert!(!ty.member("_other").expect("_other").is_static);
        assert!(ty.member("s_counter").expect("s_counter").is_static);
        assert!(ty.member("Limit").expect("Limit").is_static);
        assert_eq!(ty.member("Value").expect("Value").kind, MemberKind::Property);
        assert_eq!(ty.member("Changed").expect("Changed").kind, MemberKind::Event);
        assert!(!ty.member("Instance").expect("Instance").is_static);
        assert!(ty.member("Shared").expect("Shared").is_static);
        assert_eq!(ty.methods.len(), 2);
        assert!(ty.member("Missing").is_none());
    }
}
