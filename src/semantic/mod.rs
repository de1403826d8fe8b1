//! Semantic queries the capture analysis relies on.
//!
//! The analysis never looks at declarations itself. It asks a [`SemanticModel`]
//! which method an invocation targets and where a referenced name is bound;
//! attributes are read off the returned [`Symbol`]s. [`SourceModel`] answers
//! those questions for a single parsed C# compilation unit.

mod model;
mod scope;
mod symbols;

use tree_sitter::Node;

pub use model::SourceModel;
pub use scope::{LocalDeclaration, LocalIndex};
pub use symbols::{
    ArgumentShape, MemberKind, MemberSymbol, MethodSymbol, ParameterSymbol, Symbol, SymbolId,
    TypeSymbol,
};

/// Where a referenced name is bound.
#[derive(Debug, Clone, Copy)]
pub enum NameBinding<'tree> {
    /// A local variable or parameter; `scope` is the node whose extent bounds it.
    Local { scope: Node<'tree> },
    /// A local function. Referencing one is not a variable capture.
    LocalFunction,
    /// A field, property, event, or method reached through the implicit `this`.
    InstanceMember,
    /// A static or const member.
    StaticMember,
}

/// Symbol resolution over a syntax tree.
pub trait SemanticModel<'tree> {
    /// The single method `invocation` targets, in the shape its argument list
    /// is counted against. Ambiguous or unknown targets resolve to `None`.
    fn resolve_invocation(&self, invocation: Node<'tree>) -> Option<MethodSymbol>;

    /// Binding of an identifier used in a reference position.
    fn resolve_name(&self, identifier: Node<'tree>) -> Option<NameBinding<'tree>>;
}
