//! Helpers over tree-sitter-c-sharp nodes.
//!
//! Node kind names differ slightly between grammar releases, so lookups prefer
//! field names and fall back to structural position where a release omits a field.

use tree_sitter::Node;

/// Declarations that introduce a type and therefore bound member lookup.
pub(crate) const TYPE_DECLARATION_KINDS: &[&str] = &[
    "class_declaration",
    "struct_declaration",
    "record_declaration",
    "record_struct_declaration",
    "interface_declaration",
];

/// Nodes that own a lexical scope for the locals declared beneath them.
pub(crate) const SCOPE_KINDS: &[&str] = &[
    "block",
    "lambda_expression",
    "anonymous_method_expression",
    "method_declaration",
    "local_function_statement",
    "constructor_declaration",
    "destructor_declaration",
    "operator_declaration",
    "conversion_operator_declaration",
    "accessor_declaration",
    "indexer_declaration",
    "arrow_expression_clause",
    "for_statement",
    "for_each_statement",
    "foreach_statement",
    "using_statement",
    "fixed_statement",
    "catch_clause",
    "switch_section",
    "switch_expression_arm",
];

/// Member declarations whose declarators are fields, not locals.
pub(crate) const FIELD_DECLARATION_KINDS: &[&str] =
    &["field_declaration", "event_field_declaration"];

pub(crate) fn walk<'tree>(node: Node<'tree>, f: &mut impl FnMut(Node<'tree>)) {
    f(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, f);
    }
}

pub(crate) fn slice<'a>(source: &'a str, node: Node) -> &'a str {
    // tree-sitter offsets are UTF-8 byte indices; fall back to "" rather than panic.
    source.get(node.start_byte()..node.end_byte()).unwrap_or("")
}

/// Identifier text without the verbatim `@` prefix.
pub(crate) fn identifier_text<'a>(source: &'a str, node: Node) -> &'a str {
    let text = slice(source, node).trim();
    text.strip_prefix('@').unwrap_or(text)
}

/// Reduce a possibly qualified or generic name to its last simple segment.
///
/// `global::Acme.Perf.NoCapture` → `NoCapture`, `List<int>` → `List`.
pub(crate) fn simple_name(text: &str) -> &str {
    let text = text.trim();
    let text = match text.find(['<', '(']) {
        Some(idx) => &text[..idx],
        None => text,
    };
    let text = text.rsplit("::").next().unwrap_or(text);
    let text = text.rsplit('.').next().unwrap_or(text).trim();
    text.strip_prefix('@').unwrap_or(text)
}

pub(crate) fn is_lambda(node: Node) -> bool {
    node.kind() == "lambda_expression"
}

pub(crate) fn is_type_declaration(node: Node) -> bool {
    TYPE_DECLARATION_KINDS.contains(&node.kind())
}

pub(crate) fn is_scope(node: Node) -> bool {
    SCOPE_KINDS.contains(&node.kind())
}

/// `this` / `base` used as an expression.
pub(crate) fn is_this_reference(node: Node) -> bool {
    matches!(node.kind(), "this_expression" | "base_expression")
        || (node.is_named() && matches!(node.kind(), "this" | "base"))
}

pub(crate) fn same_node(a: Node, b: Node) -> bool {
    a.id() == b.id()
}

fn is_field<'tree>(parent: Node<'tree>, field: &str, node: Node<'tree>) -> bool {
    parent
        .child_by_field_name(field)
        .is_some_and(|child| same_node(child, node))
}

/// True when `node` is `ancestor` or lies somewhere beneath it.
pub(crate) fn is_ancestor_or_self(ancestor: Node, node: Node) -> bool {
    if ancestor.start_byte() > node.start_byte() || ancestor.end_byte() < node.end_byte() {
        return false;
    }
    let mut cur = Some(node);
    while let Some(n) = cur {
        if same_node(n, ancestor) {
            return true;
        }
        cur = n.parent();
    }
    false
}

/// Nearest ancestor (excluding `node`) matching `pred`.
pub(crate) fn find_ancestor<'tree>(
    node: Node<'tree>,
    pred: impl Fn(Node<'tree>) -> bool,
) -> Option<Node<'tree>> {
    let mut cur = node.parent();
    while let Some(n) = cur {
        if pred(n) {
            return Some(n);
        }
        cur = n.parent();
    }
    None
}

/// Parameter and body nodes of a lambda expression.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LambdaParts<'tree> {
    pub parameters: Option<Node<'tree>>,
    pub body: Option<Node<'tree>>,
}

pub(crate) fn lambda_parts(lambda: Node<'_>) -> LambdaParts<'_> {
    let mut parameters = lambda.child_by_field_name("parameters");
    let mut body = lambda.child_by_field_name("body");
    if parameters.is_some() && body.is_some() {
        return LambdaParts { parameters, body };
    }

    // Parameters are the last named node before `=>`; the body is the first one after.
    let mut seen_arrow = false;
    let mut before_arrow = None;
    let mut after_arrow = None;
    let mut cursor = lambda.walk();
    for child in lambda.children(&mut cursor) {
        if child.kind() == "=>" {
            seen_arrow = true;
            continue;
        }
        if !child.is_named() {
            continue;
        }
        if seen_arrow {
            after_arrow = Some(child);
            break;
        }
        if !matches!(child.kind(), "modifier" | "attribute_list") {
            before_arrow = Some(child);
        }
    }

    if parameters.is_none() {
        parameters = before_arrow;
    }
    if body.is_none() {
        body = after_arrow;
    }
    LambdaParts { parameters, body }
}

/// Identifiers declared by a lambda's implicit parameter form (`x => ...`).
///
/// Explicit `(int x, int y)` lists are `parameter_list` nodes and are handled
/// like any other parameter list.
pub(crate) fn implicit_lambda_parameters(lambda: Node<'_>) -> Vec<Node<'_>> {
    let Some(params) = lambda_parts(lambda).parameters else {
        return Vec::new();
    };
    match params.kind() {
        "parameter_list" => Vec::new(),
        "identifier" => vec![params],
        _ => {
            let mut out = Vec::new();
            walk(params, &mut |n| {
                if n.kind() == "identifier" {
                    out.push(n);
                }
            });
            out
        }
    }
}

/// The `argument_list` of an invocation.
pub(crate) fn argument_list(invocation: Node<'_>) -> Option<Node<'_>> {
    invocation.child_by_field_name("arguments").or_else(|| {
        let mut cursor = invocation.walk();
        invocation
            .named_children(&mut cursor)
            .find(|c| c.kind() == "argument_list")
    })
}

/// `argument` nodes of an argument list, in source order.
pub(crate) fn arguments(list: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter(|c| c.kind() == "argument")
        .collect()
}

/// Label of a named argument (`func: s => s`).
pub(crate) fn argument_label<'a>(argument: Node, source: &'a str) -> Option<&'a str> {
    let mut cursor = argument.walk();
    let name_colon = argument
        .named_children(&mut cursor)
        .find(|c| c.kind() == "name_colon")?;
    let name = name_colon
        .child_by_field_name("name")
        .or_else(|| name_colon.named_child(0))?;
    Some(identifier_text(source, name))
}

/// Keyword text of every modifier attached directly to a declaration.
pub(crate) fn modifiers<'a>(node: Node, source: &'a str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if matches!(child.kind(), "modifier" | "parameter_modifier") {
            out.push(slice(source, child).trim());
        } else if !child.is_named()
            && matches!(child.kind(), "this" | "params" | "ref" | "out" | "in" | "static")
        {
            out.push(child.kind());
        }
    }
    out
}

pub(crate) fn has_modifier(node: Node, source: &str, keyword: &str) -> bool {
    modifiers(node, source).contains(&keyword)
}

/// Simple names of the attributes attached directly to a declaration.
///
/// Lists targeting the return value (`[return: X]`) are skipped.
pub(crate) fn attribute_names(node: Node, source: &str) -> Vec<String> {
    let mut cursor = node.walk();
    let lists: Vec<Node> = node
        .children(&mut cursor)
        .filter(|c| c.kind() == "attribute_list")
        .collect();
    attribute_list_names(&lists, source)
}

/// Simple names of the attributes in `lists`, skipping `[return: X]` lists.
pub(crate) fn attribute_list_names(lists: &[Node], source: &str) -> Vec<String> {
    let mut out = Vec::new();
    for list in lists {
        let mut list_cursor = list.walk();
        let targets_return = list.named_children(&mut list_cursor).any(|c| {
            c.kind() == "attribute_target_specifier" && slice(source, c).trim().starts_with("return")
        });
        if targets_return {
            continue;
        }

        let mut list_cursor = list.walk();
        for attribute in list.named_children(&mut list_cursor) {
            if attribute.kind() != "attribute" {
                continue;
            }
            let name = attribute
                .child_by_field_name("name")
                .or_else(|| attribute.named_child(0));
            if let Some(name) = name {
                out.push(simple_name(slice(source, name)).to_string());
            }
        }
    }
    out
}

/// One declared parameter of a `parameter_list`.
#[derive(Debug, Clone)]
pub(crate) enum ParameterSyntax<'tree> {
    /// A `parameter` node.
    Single(Node<'tree>),
    /// A `params` array. The grammar inlines its attribute lists, type, and
    /// name directly into the `parameter_list`.
    Params {
        attributes: Vec<Node<'tree>>,
        name: Node<'tree>,
    },
}

impl<'tree> ParameterSyntax<'tree> {
    pub(crate) fn name(&self) -> Option<Node<'tree>> {
        match self {
            ParameterSyntax::Single(node) => node
                .child_by_field_name("name")
                .or_else(|| last_identifier_child(*node)),
            ParameterSyntax::Params { name, .. } => Some(*name),
        }
    }
}

fn last_identifier_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() == "identifier")
        .last()
}

/// Parameters of a `parameter_list` in declaration order.
pub(crate) fn parameter_syntax(list: Node<'_>) -> Vec<ParameterSyntax<'_>> {
    let mut out = Vec::new();
    let mut pending_attributes = Vec::new();
    let mut in_params = false;

    let mut cursor = list.walk();
    for child in list.children(&mut cursor) {
        match child.kind() {
            "parameter" | "parameter_array" => {
                out.push(ParameterSyntax::Single(child));
                pending_attributes.clear();
                in_params = false;
            }
            "attribute_list" => pending_attributes.push(child),
            "params" if !child.is_named() => in_params = true,
            "identifier" if in_params => {
                out.push(ParameterSyntax::Params {
                    attributes: std::mem::take(&mut pending_attributes),
                    name: child,
                });
                in_params = false;
            }
            "," => {
                pending_attributes.clear();
                in_params = false;
            }
            _ => {}
        }
    }
    out
}

/// Whether an identifier is used as a value (a candidate capture) rather than
/// as a declared name, a member name after `.`, a type, or a label.
pub(crate) fn is_reference_position(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    if is_field(parent, "name", node) || is_field(parent, "type", node) {
        return false;
    }

    match parent.kind() {
        // `new Dto { Id = 1 }` assigns the created object's member, not ours.
        "assignment_expression" => !(parent
            .parent()
            .is_some_and(|p| p.kind() == "initializer_expression")
            && parent
                .child_by_field_name("left")
                .or_else(|| parent.named_child(0))
                .is_some_and(|left| same_node(left, node))),
        // `r with { Id = 2 }`
        "simple_assignment_expression" => !parent
            .named_child(0)
            .is_some_and(|left| same_node(left, node)),
        // `Foo<int>(...)` references a method, `List<int> xs` names a type.
        "generic_name" => is_reference_position(parent),
        // Only the receiver of `a.b` is a value; `b` is looked up on its type.
        "member_access_expression" => parent
            .named_child(0)
            .is_some_and(|receiver| same_node(receiver, node)),
        "lambda_expression" => !lambda_parts(parent)
            .parameters
            .is_some_and(|params| same_node(params, node)),
        "for_each_statement" | "foreach_statement" => !is_field(parent, "left", node),
        // Newer grammars inline `= value` into the declarator; only the name is a declaration.
        "variable_declarator" => !parent
            .named_child(0)
            .is_some_and(|name| same_node(name, node)),
        "member_binding_expression"
        | "name_colon"
        | "name_equals"
        | "qualified_name"
        | "alias_qualified_name"
        | "type_argument_list"
        | "array_type"
        | "nullable_type"
        | "pointer_type"
        | "ref_type"
        | "tuple_element"
        | "attribute"
        | "base_list"
        | "type_parameter"
        | "type_parameter_list"
        | "type_parameter_constraints_clause"
        | "type_constraint"
        | "labeled_statement"
        | "goto_statement"
        | "parameter"
        | "parameter_array"
        | "catch_declaration"
        | "declaration_expression"
        | "declaration_pattern"
        | "var_pattern"
        | "recursive_pattern"
        | "single_variable_designation"
        | "parenthesized_variable_designation"
        | "implicit_parameter_list"
        | "parameter_list"
        | "local_function_statement"
        | "method_declaration"
        | "using_directive"
        | "namespace_declaration"
        | "file_scoped_namespace_declaration"
        | "explicit_interface_specifier" => false,
        _ => true,
    }
}

/// `nameof(x)` mentions `x` without reading it.
pub(crate) fn is_nameof_invocation(node: Node, source: &str) -> bool {
    node.kind() == "invocation_expression"
        && node
            .child_by_field_name("function")
            .or_else(|| node.named_child(0))
            .is_some_and(|f| f.kind() == "identifier" && identifier_text(source, f) == "nameof")
}
