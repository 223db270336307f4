//! Best-effort static types of expressions.

use alloc::string::ToString;

use glsl_cst::{NodeId, NodeKind, SyntaxTree, TokenKind};

use crate::{diagnostics::Diagnostics, symbols::SymbolTable, types::GlslType};

/// Static type of `node`, or `None` when it cannot be determined.
///
/// Handles identifiers, literals, field selections, indexing, constructor
/// and function calls, and the wrappers around them. Invalid field
/// selections are reported and yield `None`.
pub(crate) fn static_type(
    tree: &SyntaxTree,
    symbols: &SymbolTable<'_>,
    node: NodeId,
    diagnostics: &mut Diagnostics,
) -> Option<GlslType> {
    match tree.kind(node) {
        NodeKind::PrimaryExpression => {
            let token = tree.child_tokens(node).next()?;
            match token.kind {
                TokenKind::Identifier => symbols
                    .lookup_variable(&token.text)
                    .map(|variable| variable.ty.clone()),
                TokenKind::IntLiteral => symbols.lookup_type("int"),
                TokenKind::UintLiteral => symbols.lookup_type("uint"),
                TokenKind::FloatLiteral => symbols.lookup_type("float"),
                TokenKind::BoolLiteral => symbols.lookup_type("bool"),
                _ => None,
            }
        }
        NodeKind::FieldSelection => {
            let base = tree.child_nodes(node).next()?;
            let field = tree.identifier(node)?;
            let base_type = static_type(tree, symbols, base, diagnostics)?;
            match base_type.field_type(&field.text) {
                Ok(ty) => Some(ty),
                Err(err) => {
                    diagnostics.report(field, err.to_string());
                    None
                }
            }
        }
        NodeKind::IndexExpression => {
            let base = tree.child_nodes(node).next()?;
            if let Some(array) = array_variable(tree, symbols, base) {
                return Some(array);
            }
            static_type(tree, symbols, base, diagnostics)?.element_type()
        }
        NodeKind::FunctionCall => {
            let name = tree.call_name(node)?;
            if let Some(constructed) = symbols.lookup_type(&name) {
                return Some(constructed);
            }
            // Overloads disagreeing on the return type leave the call untyped.
            let overloads = symbols.lookup_function(&name);
            let (first, rest) = overloads.split_first()?;
            rest.iter()
                .all(|sig| sig.return_type == first.return_type)
                .then(|| first.return_type.clone())
        }
        NodeKind::ConditionalExpression => {
            let value = tree.child_nodes(node).nth(1)?;
            static_type(tree, symbols, value, diagnostics)
        }
        NodeKind::ParenExpression
        | NodeKind::AssignmentExpression
        | NodeKind::UnaryExpression
        | NodeKind::PostfixExpression => {
            let inner = tree.child_nodes(node).next()?;
            static_type(tree, symbols, inner, diagnostics)
        }
        NodeKind::Expression => {
            let last = tree.child_nodes(node).last()?;
            static_type(tree, symbols, last, diagnostics)
        }
        _ => None,
    }
}

/// Element type of `node` when it names an array variable.
fn array_variable(tree: &SyntaxTree, symbols: &SymbolTable<'_>, node: NodeId) -> Option<GlslType> {
    if tree.kind(node) != NodeKind::PrimaryExpression {
        return None;
    }
    let token = tree.identifier(node)?;
    symbols
        .lookup_variable(&token.text)
        .filter(|variable| variable.is_array)
        .map(|variable| variable.ty.clone())
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String, vec::Vec};

    use glsl_cst::parse;

    use super::*;
    use crate::{
        builtins::Catalog,
        symbols::Variable,
        types::{StructType, VectorType},
    };

    fn symbols() -> SymbolTable<'static> {
        let catalog = Catalog::builtin().unwrap();
        let mut symbols = SymbolTable::new(catalog);
        let vec2 = symbols.lookup_type("vec2").unwrap();
        let vec3 = symbols.lookup_type("vec3").unwrap();
        symbols.declare_variable("v".into(), vec2);
        symbols.declare_variable("m".into(), GlslType::primitive("mat3"));
        symbols.declare(Variable {
            name: "weights".into(),
            ty: GlslType::primitive("float"),
            is_array: true,
        });
        let mut light = StructType::new("Light");
        light.add_field("color", vec3);
        light.add_field("intensity", GlslType::primitive("float"));
        symbols.declare_struct(light.into());
        let light = symbols.lookup_type("Light").unwrap();
        symbols.declare_variable("l".into(), light);
        symbols
    }

    /// Static type name of `expr`, plus the diagnostics it produced.
    fn type_of(expr: &str) -> (Option<String>, usize) {
        let tree = parse(&format!("void main() {{ {}; }}", expr)).unwrap();
        let def = tree.child_nodes(tree.root()).next().unwrap();
        let body = tree.find_child(def, NodeKind::CompoundStatement).unwrap();
        let statement = tree.child_nodes(body).next().unwrap();
        let expression = tree.child_nodes(statement).next().unwrap();

        let symbols = symbols();
        let mut diagnostics = Diagnostics::default();
        let ty = static_type(&tree, &symbols, expression, &mut diagnostics);
        let reported: Vec<_> = diagnostics.into_vec();
        (ty.map(|ty| ty.name().into()), reported.len())
    }

    #[test]
    fn test_identifiers_and_literals() {
        assert_eq!(type_of("v").0.as_deref(), Some("vec2"));
        assert_eq!(type_of("1").0.as_deref(), Some("int"));
        assert_eq!(type_of("1.5").0.as_deref(), Some("float"));
        assert_eq!(type_of("true").0.as_deref(), Some("bool"));
        assert_eq!(type_of("missing").0, None);
    }

    #[test]
    fn test_field_selection() {
        assert_eq!(type_of("v.x").0.as_deref(), Some("float"));
        assert_eq!(type_of("v.yx").0.as_deref(), Some("vec2"));
        assert_eq!(type_of("l.color.rg").0.as_deref(), Some("vec2"));
        assert_eq!(type_of("l.intensity").0.as_deref(), Some("float"));
    }

    #[test]
    fn test_invalid_field_is_reported() {
        assert_eq!(type_of("v.z"), (None, 1));
        assert_eq!(type_of("l.radius"), (None, 1));
    }

    #[test]
    fn test_indexing() {
        assert_eq!(type_of("weights[2]").0.as_deref(), Some("float"));
        assert_eq!(type_of("v[0]").0.as_deref(), Some("float"));
        assert_eq!(type_of("m[1]").0.as_deref(), Some("vec3"));
        assert_eq!(type_of("m[1].z").0.as_deref(), Some("float"));
    }

    #[test]
    fn test_calls() {
        assert_eq!(type_of("vec3(1.0)").0.as_deref(), Some("vec3"));
        assert_eq!(type_of("Light(vec3(1.0), 1.0)").0.as_deref(), Some("Light"));
        assert_eq!(type_of("dot(v, v)").0.as_deref(), Some("float"));
        // One return type per overload member.
        assert_eq!(type_of("sin(v)").0, None);
    }

    #[test]
    fn test_wrappers() {
        assert_eq!(type_of("(v)").0.as_deref(), Some("vec2"));
        assert_eq!(type_of("-v.x").0.as_deref(), Some("float"));
        assert_eq!(
            VectorType::new(GlslType::primitive("float"), 2).unwrap().name(),
            type_of("((v))").0.unwrap()
        );
    }
}
