//! Detection of user functions that re-declare a builtin.

use alloc::{string::String, vec::Vec};

use glsl_cst::{NodeId, NodeKind, SyntaxTree, Token};

use crate::builtins::Catalog;

/// Function prototype as written in the source.
#[derive(Debug, Clone)]
pub(crate) struct Prototype<'t> {
    pub name: &'t Token,
    /// Return type specifier text, qualifiers excluded
    pub return_type: String,
    pub params: Vec<Parameter<'t>>,
}

#[derive(Debug, Clone)]
pub(crate) struct Parameter<'t> {
    /// Type specifier text, including any array dimensions
    pub type_text: String,
    /// Base type name, used for symbol lookup
    pub type_name: Option<&'t str>,
    pub name: Option<&'t Token>,
    pub is_array: bool,
    /// First token of the type specifier, for diagnostics
    pub type_token: &'t Token,
}

/// Read the prototype under a `FunctionPrototype` node.
pub(crate) fn read_prototype(tree: &SyntaxTree, prototype: NodeId) -> Option<Prototype<'_>> {
    let name = tree.identifier(prototype)?;
    let return_type = tree
        .find_child(prototype, NodeKind::FullySpecifiedType)
        .and_then(|ty| tree.find_child(ty, NodeKind::TypeSpecifier))
        .map(|ty| tree.text(ty))?;
    let params = tree
        .child_nodes(prototype)
        .filter(|node| tree.kind(*node) == NodeKind::ParameterDeclaration)
        .map(|param| read_parameter(tree, param))
        .collect::<Option<Vec<_>>>()?;
    Some(Prototype {
        name,
        return_type,
        params,
    })
}

fn read_parameter(tree: &SyntaxTree, param: NodeId) -> Option<Parameter<'_>> {
    let ty = tree.find_child(param, NodeKind::TypeSpecifier)?;
    let (first, _) = tree.token_range(ty);
    Some(Parameter {
        type_text: tree.text(ty),
        type_name: tree.type_name(ty),
        name: tree.identifier(param),
        is_array: tree.has_array_specifier(ty) || tree.has_array_specifier(param),
        type_token: tree.token(first),
    })
}

/// Whether `prototype` matches a builtin overload exactly: same name, same
/// return type and the same parameter types in order.
pub(crate) fn is_builtin_override(catalog: &Catalog, prototype: &Prototype<'_>) -> bool {
    catalog
        .overloads(&prototype.name.text)
        .iter()
        .any(|builtin| {
            builtin.return_type.name() == prototype.return_type
                && builtin.params.len() == prototype.params.len()
                && builtin
                    .params
                    .iter()
                    .zip(&prototype.params)
                    .all(|(expected, param)| {
                        !param.is_array && expected.name() == param.type_text
                    })
        })
}
