use std::collections::HashSet;

use itertools::Itertools;
use tree_sitter::{Node, Tree};

use super::scope::LocalIndex;
use super::symbols::{ArgumentShape, MemberSymbol, MethodSymbol, TypeSymbol};
use super::{NameBinding, SemanticModel};
use crate::syntax::{
    identifier_text, is_this_reference, is_type_declaration, same_node, simple_name, slice, walk,
};

/// Semantic model over a single parsed compilation unit.
///
/// Only declarations inside the unit are known. Calls to anything else
/// (framework methods, other files) stay unresolved.
pub struct SourceModel<'tree> {
    source: &'tree str,
    types: Vec<(Node<'tree>, TypeSymbol)>,
    local_functions: Vec<(Node<'tree>, MethodSymbol)>,
    locals: LocalIndex<'tree>,
}

impl<'tree> SourceModel<'tree> {
    pub fn new(tree: &'tree Tree, source: &'tree str) -> Self {
        Self::from_root(tree.root_node(), source)
    }

    pub fn from_root(root: Node<'tree>, source: &'tree str) -> Self {
        let mut types = Vec::new();
        let mut local_functions = Vec::new();
        walk(root, &mut |node| {
            if is_type_declaration(node) {
                if let Some(ty) = TypeSymbol::from_declaration(node, source) {
                    types.push((node, ty));
                }
            } else if node.kind() == "local_function_statement"
                && let Some(method) = MethodSymbol::from_declaration(node, source, None)
            {
                local_functions.push((node, method));
            }
        });

        Self {
            source,
            types,
            local_functions,
            locals: LocalIndex::build(root, source),
        }
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeSymbol> {
        self.types.iter().map(|(_, ty)| ty)
    }

    fn type_declared_by(&self, node: Node) -> Option<&TypeSymbol> {
        self.types
            .iter()
            .find(|(decl, _)| same_node(*decl, node))
            .map(|(_, ty)| ty)
    }

    fn types_named<'m>(&'m self, name: &'m str) -> impl Iterator<Item = &'m TypeSymbol> {
        self.types().filter(move |ty| ty.name == name)
    }

    /// Types lexically enclosing `node`, innermost first.
    fn enclosing_types(&self, node: Node) -> Vec<&TypeSymbol> {
        let mut out = Vec::new();
        let mut cur = node.parent();
        while let Some(n) = cur {
            if is_type_declaration(n)
                && let Some(ty) = self.type_declared_by(n)
            {
                out.push(ty);
            }
            cur = n.parent();
        }
        out
    }

    /// `ty`, its other partial declarations, and every base type declared in this unit.
    fn lineage<'m>(&'m self, ty: &'m TypeSymbol) -> Vec<&'m TypeSymbol> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut pending = vec![ty.name.as_str()];
        let mut out = Vec::new();
        while let Some(name) = pending.pop() {
            if !seen.insert(name) {
                continue;
            }
            for part in self.types_named(name) {
                out.push(part);
                pending.extend(part.bases.iter().map(String::as_str));
            }
        }
        out
    }

    fn methods_in_lineage<'m>(&'m self, ty: &'m TypeSymbol, name: &'m str) -> Vec<&'m MethodSymbol> {
        self.lineage(ty)
            .into_iter()
            .flat_map(|t| t.methods.iter())
            .filter(|m| m.name == name)
            .collect()
    }

    fn find_member(&self, at: Node, name: &str) -> Option<&MemberSymbol> {
        self.enclosing_types(at)
            .into_iter()
            .flat_map(|ty| self.lineage(ty))
            .find_map(|ty| ty.member(name))
    }

    fn local_function(&self, declaration: Node) -> Option<&MethodSymbol> {
        self.local_functions
            .iter()
            .find(|(decl, _)| same_node(*decl, declaration))
            .map(|(_, method)| method)
    }

    /// A receiver naming a type declared in this unit (`Helpers.Run(...)`).
    fn static_receiver(&self, receiver: Node<'tree>) -> Option<&TypeSymbol> {
        if !matches!(
            receiver.kind(),
            "identifier" | "generic_name" | "qualified_name"
        ) {
            return None;
        }
        if receiver.kind() == "identifier" && self.resolve_name(receiver).is_some() {
            return None;
        }
        let name = simple_name(slice(self.source, receiver));
        self.types_named(name).next()
    }

    /// Methods callable as `receiver.name(...)` on an arbitrary receiver.
    ///
    /// Extension methods are presented in their reduced form.
    fn methods_on_any_receiver(&self, name: &str) -> Vec<MethodSymbol> {
        self.types()
            .flat_map(|ty| ty.methods.iter())
            .filter(|m| m.name == name)
            .map(|m| m.reduced().unwrap_or_else(|| m.clone()))
            .collect()
    }

    fn candidates(&self, invocation: Node<'tree>, function: Node<'tree>) -> Vec<MethodSymbol> {
        match function.kind() {
            "identifier" | "generic_name" => {
                let name = simple_name(slice(self.source, function));
                // Invoking a delegate held in a local or parameter.
                if self.locals.lookup(name, invocation).is_some() {
                    return Vec::new();
                }
                if let Some(decl) = self.locals.lookup_function(name, invocation) {
                    return self
                        .local_function(decl.declarator)
                        .cloned()
                        .into_iter()
                        .collect();
                }
                self.enclosing_types(invocation)
                    .into_iter()
                    .map(|ty| self.methods_in_lineage(ty, name))
                    .find(|found| !found.is_empty())
                    .unwrap_or_default()
                    .into_iter()
                    .cloned()
                    .collect()
            }
            "member_access_expression" => {
                let Some(name) = function.child_by_field_name("name") else {
                    return Vec::new();
                };
                let name = simple_name(slice(self.source, name));
                let receiver = function
                    .child_by_field_name("expression")
                    .or_else(|| function.named_child(0));

                match receiver {
                    Some(receiver) if is_this_reference(receiver) => self
                        .enclosing_types(invocation)
                        .first()
                        .map(|ty| self.methods_in_lineage(ty, name))
                        .unwrap_or_default()
                        .into_iter()
                        .cloned()
                        .collect(),
                    Some(receiver) => match self.static_receiver(receiver) {
                        Some(ty) => self
                            .methods_in_lineage(ty, name)
                            .into_iter()
                            .cloned()
                            .collect(),
                        None => self.methods_on_any_receiver(name),
                    },
                    None => Vec::new(),
                }
            }
            // `receiver?.Name(...)`
            "member_binding_expression" => function
                .child_by_field_name("name")
                .map(|name| self.methods_on_any_receiver(simple_name(slice(self.source, name))))
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

impl<'tree> SemanticModel<'tree> for SourceModel<'tree> {
    fn resolve_invocation(&self, invocation: Node<'tree>) -> Option<MethodSymbol> {
        if invocation.kind() != "invocation_expression" {
            return None;
        }
        let function = invocation
            .child_by_field_name("function")
            .or_else(|| invocation.named_child(0))?;
        let shape = ArgumentShape::from_invocation(invocation, self.source);

        let mut applicable = self
            .candidates(invocation, function)
            .into_iter()
            .filter(|m| m.is_applicable(&shape))
            .unique_by(|m| (m.id, m.is_reduced));

        let method = applicable.next()?;
        if applicable.next().is_some() {
            crate::trace_debug!(method = %method.name, "ambiguous invocation left unresolved");
            return None;
        }
        Some(method)
    }

    fn resolve_name(&self, identifier: Node<'tree>) -> Option<NameBinding<'tree>> {
        let name = identifier_text(self.source, identifier);
        if let Some(local) = self.locals.lookup(name, identifier) {
            return Some(NameBinding::Local { scope: local.scope });
        }
        if self.locals.lookup_function(name, identifier).is_some() {
            return Some(NameBinding::LocalFunction);
        }
        let member = self.find_member(identifier, name)?;
        Some(if member.is_static {
            NameBinding::StaticMember
        } else {
            NameBinding::InstanceMember
        })
    }
}
