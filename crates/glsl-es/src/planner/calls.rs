//! Call argument contexts.
//!
//! Before a call's arguments are walked, each argument gets a best-effort
//! type and the first compatible overload decides which arguments start in
//! a float context.

use alloc::{string::String, vec::Vec};

use glsl_cst::{NodeId, SyntaxTree};

use crate::{symbols::SymbolTable, types::GlslType};

/// Best-effort type of a call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ArgumentType {
    Known(String),
    /// Anything but a plain variable or number. Compatible with every
    /// parameter.
    Unknown,
}

impl ArgumentType {
    fn fits(&self, expected: &GlslType) -> bool {
        match self {
            ArgumentType::Known(actual) => {
                actual == expected.name() || (actual == "int" && expected.is_float())
            }
            ArgumentType::Unknown => true,
        }
    }
}

/// Type of an argument judged from its text alone: a variable name, an
/// integer or a float literal.
pub(crate) fn infer_argument_type(
    tree: &SyntaxTree,
    symbols: &SymbolTable<'_>,
    argument: NodeId,
) -> ArgumentType {
    let text = tree.text(argument);
    if let Some(variable) = symbols.lookup_variable(&text) {
        return ArgumentType::Known(variable.ty.name().into());
    }
    if is_digits(&text) {
        return ArgumentType::Known("int".into());
    }
    match text.split_once('.') {
        Some((whole, fraction))
            if is_digits(whole) && fraction.bytes().all(|b| b.is_ascii_digit()) =>
        {
            ArgumentType::Known("float".into())
        }
        _ => ArgumentType::Unknown,
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Per-argument float flags from the first overload of `name` that accepts
/// `arguments`, user overloads first. `None` when nothing matches.
pub(crate) fn argument_float_flags(
    symbols: &SymbolTable<'_>,
    name: &str,
    arguments: &[ArgumentType],
) -> Option<Vec<bool>> {
    symbols
        .lookup_function(name)
        .into_iter()
        .find(|sig| {
            sig.params.len() == arguments.len()
                && arguments
                    .iter()
                    .zip(&sig.params)
                    .all(|(actual, expected)| actual.fits(expected))
        })
        .map(|sig| sig.params.iter().map(GlslType::is_float).collect())
}
