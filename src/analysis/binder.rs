//! Binding of an argument expression to the method and parameter it satisfies.

use tree_sitter::Node;

use crate::semantic::{MethodSymbol, ParameterSymbol, SemanticModel};
use crate::syntax::{argument_label, arguments, same_node};

/// The (method, parameter) pair an argument expression is bound to.
#[derive(Debug, Clone)]
pub struct CallBinding<'tree> {
    pub method: MethodSymbol,
    /// `None` when no parameter matches (an unknown label, or too many arguments).
    pub parameter: Option<ParameterSymbol>,
    pub argument: Node<'tree>,
}

/// The `argument -> argument_list -> invocation_expression` chain above an argument value.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentSite<'tree> {
    pub argument: Node<'tree>,
    pub list: Node<'tree>,
    pub invocation: Node<'tree>,
}

impl<'tree> ArgumentSite<'tree> {
    /// `None` unless `value` is the direct value of an invocation argument.
    pub fn of(value: Node<'tree>) -> Option<Self> {
        let argument = value.parent().filter(|n| n.kind() == "argument")?;
        let list = argument.parent().filter(|n| n.kind() == "argument_list")?;
        let invocation = list
            .parent()
            .filter(|n| n.kind() == "invocation_expression")?;
        Some(Self {
            argument,
            list,
            invocation,
        })
    }

    /// Zero-based position of the argument within its list.
    pub fn position(&self) -> Option<usize> {
        arguments(self.list)
            .into_iter()
            .position(|arg| same_node(arg, self.argument))
    }
}

/// Resolve the method and parameter `value` is passed to.
pub fn bind<'tree>(
    value: Node<'tree>,
    model: &impl SemanticModel<'tree>,
    source: &str,
) -> Option<CallBinding<'tree>> {
    let site = ArgumentSite::of(value)?;
    let Some(method) = model.resolve_invocation(site.invocation) else {
        crate::trace_debug!(row = site.invocation.start_position().row + 1, "callee unresolved");
        return None;
    };

    let parameter = match argument_label(site.argument, source) {
        Some(label) => method.parameter_named(label).cloned(),
        None => site
            .position()
            .and_then(|index| parameter_at(&method, index))
            .cloned(),
    };

    Some(CallBinding {
        method,
        parameter,
        argument: site.argument,
    })
}

/// Parameter receiving the positional argument at `index`, folding extra
/// trailing arguments into the `params` parameter.
fn parameter_at(method: &MethodSymbol, index: usize) -> Option<&ParameterSymbol> {
    method.parameters.get(index).or_else(|| {
        method
            .variadic_parameter()
            .filter(|params| index >= params.ordinal)
    })
}
