//! Local declaration sites and the scope node that owns each of them.

use std::collections::HashMap;

use tree_sitter::Node;

use crate::syntax::{
    FIELD_DECLARATION_KINDS, find_ancestor, identifier_text, implicit_lambda_parameters,
    is_ancestor_or_self, is_lambda, is_scope, is_type_declaration, parameter_syntax, walk,
};

/// A local variable or parameter together with the node whose extent bounds it.
#[derive(Debug, Clone, Copy)]
pub struct LocalDeclaration<'tree> {
    /// The declaring identifier.
    pub declarator: Node<'tree>,
    pub scope: Node<'tree>,
}

/// Parents under which a bare identifier declares a pattern or `out var` variable.
const DESIGNATION_PARENTS: &[&str] = &[
    "declaration_pattern",
    "declaration_expression",
    "var_pattern",
    "recursive_pattern",
    "single_variable_designation",
    "parenthesized_variable_designation",
];

/// Query clauses that introduce range variables.
const RANGE_VARIABLE_PARENTS: &[&str] =
    &["from_clause", "let_clause", "join_clause", "join_into_clause", "query_continuation"];

/// Every local declaration of one compilation unit, indexed by name.
#[derive(Debug, Default)]
pub struct LocalIndex<'tree> {
    locals: HashMap<String, Vec<LocalDeclaration<'tree>>>,
    functions: HashMap<String, Vec<LocalDeclaration<'tree>>>,
}

impl<'tree> LocalIndex<'tree> {
    pub fn build(root: Node<'tree>, source: &str) -> Self {
        let mut index = Self::default();
        walk(root, &mut |node| index.collect(node, source));
        index
    }

    fn push(&mut self, source: &str, declarator: Node<'tree>, scope: Node<'tree>) {
        let name = identifier_text(source, declarator);
        if name.is_empty() || name == "_" {
            return;
        }
        self.locals
            .entry(name.to_string())
            .or_default()
            .push(LocalDeclaration { declarator, scope });
    }

    fn collect(&mut self, node: Node<'tree>, source: &str) {
        match node.kind() {
            "parameter_list" => {
                let Some(owner) = node.parent() else {
                    return;
                };
                // Primary constructor parameters are type state, delegate parameters bind nothing.
                if is_type_declaration(owner) || owner.kind() == "delegate_declaration" {
                    return;
                }
                for param in parameter_syntax(node) {
                    if let Some(name) = param.name() {
                        self.push(source, name, owner);
                    }
                }
            }
            _ if is_lambda(node) => {
                for param in implicit_lambda_parameters(node) {
                    self.push(source, param, node);
                }
            }
            "variable_declarator" => {
                let in_field = node
                    .parent()
                    .and_then(|decl| decl.parent())
                    .is_some_and(|owner| FIELD_DECLARATION_KINDS.contains(&owner.kind()));
                if in_field {
                    return;
                }
                let name = node
                    .child_by_field_name("name")
                    .or_else(|| node.named_child(0))
                    .filter(|n| n.kind() == "identifier");
                if let (Some(name), Some(scope)) = (name, find_ancestor(node, is_scope)) {
                    self.push(source, name, scope);
                }
            }
            "for_each_statement" | "foreach_statement" => {
                let left = node.child_by_field_name("left");
                if let Some(left) = left {
                    walk(left, &mut |n| {
                        if n.kind() == "identifier" {
                            self.push(source, n, node);
                        }
                    });
                }
            }
            "catch_declaration" => {
                let name = node.child_by_field_name("name").or_else(|| {
                    let mut cursor = node.walk();
                    node.named_children(&mut cursor)
                        .filter(|c| c.kind() == "identifier")
                        .nth(1)
                });
                let clause = find_ancestor(node, |n| n.kind() == "catch_clause");
                if let (Some(name), Some(clause)) = (name, clause) {
                    self.push(source, name, clause);
                }
            }
            "identifier" => {
                let Some(parent) = node.parent() else {
                    return;
                };
                let is_type = parent
                    .child_by_field_name("type")
                    .is_some_and(|ty| ty.id() == node.id());
                if DESIGNATION_PARENTS.contains(&parent.kind()) && !is_type {
                    if let Some(scope) = find_ancestor(node, is_scope) {
                        self.push(source, node, scope);
                    }
                } else if RANGE_VARIABLE_PARENTS.contains(&parent.kind()) && !is_type {
                    let query = find_ancestor(node, |n| n.kind() == "query_expression");
                    if let Some(query) = query {
                        self.push(source, node, query);
                    }
                }
            }
            "local_function_statement" => {
                let name = node.child_by_field_name("name");
                if let (Some(name), Some(scope)) = (name, find_ancestor(node, is_scope)) {
                    self.functions
                        .entry(identifier_text(source, name).to_string())
                        .or_default()
                        .push(LocalDeclaration {
                            declarator: node,
                            scope,
                        });
                }
            }
            _ => {}
        }
    }

    /// The innermost local named `name` whose scope encloses `at`.
    pub fn lookup(&self, name: &str, at: Node<'tree>) -> Option<LocalDeclaration<'tree>> {
        innermost(self.locals.get(name)?, at)
    }

    /// The innermost local function named `name` visible from `at`.
    pub fn lookup_function(&self, name: &str, at: Node<'tree>) -> Option<LocalDeclaration<'tree>> {
        innermost(self.functions.get(name)?, at)
    }
}

fn innermost<'tree>(
    candidates: &[LocalDeclaration<'tree>],
    at: Node<'tree>,
) -> Option<LocalDeclaration<'tree>> {
    candidates
        .iter()
        .filter(|decl| is_ancestor_or_self(decl.scope, at))
        .min_by_key(|decl| decl.scope.end_byte() - decl.scope.start_byte())
        .copied()
}
