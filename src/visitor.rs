use tree_sitter::Node;

use crate::syntax::{is_lambda, is_type_declaration};

pub trait CSharpVisitor<'tree> {
    fn visit_type(&mut self, _node: Node<'tree>) {}
    fn visit_method(&mut self, _node: Node<'tree>) {}
    fn visit_invocation(&mut self, _node: Node<'tree>) {}
    fn visit_lambda(&mut self, _node: Node<'tree>) {}
}

/// Pre-order walk: a node is visited before anything nested inside it.
pub fn walk_tree<'tree>(root: Node<'tree>, visitor: &mut impl CSharpVisitor<'tree>) {
    walk_node(root, visitor);
}

fn walk_node<'tree>(node: Node<'tree>, visitor: &mut impl CSharpVisitor<'tree>) {
    match node.kind() {
        _ if is_type_declaration(node) => visitor.visit_type(node),
        _ if is_lambda(node) => visitor.visit_lambda(node),
        "method_declaration" | "local_function_statement" => visitor.visit_method(node),
        "invocation_expression" => visitor.visit_invocation(node),
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk_node(child, visitor);
    }
}
