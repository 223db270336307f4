//! Bottom-up float context resolution.
//!
//! Answers one question for an expression subtree: does any part of it
//! require a float interpretation? The answer is the OR over every leaf.
//! Float literals and `float` variables count directly. An integer literal
//! counts when the operand resolved just before it has type `float`, which
//! is what the type stack tracks within a single query.

use alloc::{format, string::ToString, vec::Vec};

use glsl_cst::{NodeId, NodeKind, SyntaxTree, TokenKind};
use log::debug;

use crate::{
    diagnostics::Diagnostics, symbols::SymbolTable, types::GlslType, typing::static_type,
};

pub(crate) struct ContextResolver<'a, 'c> {
    tree: &'a SyntaxTree,
    symbols: &'a SymbolTable<'c>,
    /// Types of the operands resolved so far in the current query
    type_stack: Vec<GlslType>,
}

impl<'a, 'c> ContextResolver<'a, 'c> {
    pub fn new(tree: &'a SyntaxTree, symbols: &'a SymbolTable<'c>) -> Self {
        ContextResolver {
            tree,
            symbols,
            type_stack: Vec::new(),
        }
    }

    /// Whether `node` requires a float interpretation.
    pub fn resolve(&mut self, node: NodeId, diagnostics: &mut Diagnostics) -> bool {
        self.type_stack.clear();
        self.visit(node, diagnostics)
    }

    fn visit(&mut self, node: NodeId, diagnostics: &mut Diagnostics) -> bool {
        match self.tree.kind(node) {
            NodeKind::PrimaryExpression => self.visit_primary(node, diagnostics),
            NodeKind::FieldSelection => self.visit_field_selection(node, diagnostics),
            NodeKind::FunctionCall => {
                // The callee is a name, not an operand.
                let tree = self.tree;
                let mut any = false;
                for argument in tree.call_arguments(node) {
                    any |= self.visit(argument, diagnostics);
                }
                any
            }
            NodeKind::AssignmentExpression => {
                let any = self.visit_children(node, diagnostics);
                self.type_stack.clear();
                any
            }
            _ => self.visit_children(node, diagnostics),
        }
    }

    /// OR over all child nodes. Every child is visited.
    fn visit_children(&mut self, node: NodeId, diagnostics: &mut Diagnostics) -> bool {
        let tree = self.tree;
        let mut any = false;
        for child in tree.child_nodes(node) {
            any |= self.visit(child, diagnostics);
        }
        any
    }

    fn visit_primary(&mut self, node: NodeId, diagnostics: &mut Diagnostics) -> bool {
        let Some(token) = self.tree.child_tokens(node).next() else {
            return false;
        };
        match token.kind {
            TokenKind::FloatLiteral => true,
            TokenKind::IntLiteral => self.type_stack.last().is_some_and(GlslType::is_float),
            TokenKind::Identifier => {
                if let Some(variable) = self.symbols.lookup_variable(&token.text) {
                    let is_float = variable.ty.is_float();
                    self.type_stack.push(variable.ty.clone());
                    return is_float;
                }
                if self.symbols.lookup_function(&token.text).is_empty() {
                    debug!("unresolved identifier '{}'", token.text);
                    diagnostics.report(token, format!("unresolved identifier '{}'", token.text));
                }
                false
            }
            _ => false,
        }
    }

    fn visit_field_selection(&mut self, node: NodeId, diagnostics: &mut Diagnostics) -> bool {
        let tree = self.tree;
        let Some(base) = tree.child_nodes(node).next() else {
            return false;
        };
        let from_base = self.visit(base, diagnostics);
        let Some(field) = tree.identifier(node) else {
            return from_base;
        };
        let Some(base_type) = static_type(tree, self.symbols, base, diagnostics) else {
            return from_base;
        };
        match base_type.field_type(&field.text) {
            Ok(ty) => {
                let is_float = ty.is_float();
                self.type_stack.push(ty);
                from_base || is_float
            }
            Err(err) => {
                diagnostics.report(field, err.to_string());
                from_base
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use glsl_cst::{parse, SyntaxTree};

    use super::*;
    use crate::{builtins::Catalog, types::StructType};

    fn symbols() -> SymbolTable<'static> {
        let mut symbols = SymbolTable::new(Catalog::builtin().unwrap());
        symbols.declare_variable("f".into(), GlslType::primitive("float"));
        symbols.declare_variable("i".into(), GlslType::primitive("int"));
        let vec2 = symbols.lookup_type("vec2").unwrap();
        symbols.declare_variable("v".into(), vec2);
        let mut light = StructType::new("Light");
        light.add_field("intensity", GlslType::primitive("float"));
        light.add_field("count", GlslType::primitive("int"));
        symbols.declare_struct(light.into());
        let light = symbols.lookup_type("Light").unwrap();
        symbols.declare_variable("l".into(), light);
        symbols
    }

    fn expression(source: &str) -> (SyntaxTree, NodeId) {
        let tree = parse(&format!("void main() {{ {}; }}", source)).unwrap();
        let def = tree.child_nodes(tree.root()).next().unwrap();
        let body = tree.find_child(def, NodeKind::CompoundStatement).unwrap();
        let statement = tree.child_nodes(body).next().unwrap();
        let expression = tree.child_nodes(statement).next().unwrap();
        let assignment = tree.child_nodes(expression).next().unwrap();
        (tree, assignment)
    }

    fn resolve(source: &str) -> (bool, usize) {
        let (tree, node) = expression(source);
        let symbols = symbols();
        let mut diagnostics = Diagnostics::default();
        let verdict = ContextResolver::new(&tree, &symbols).resolve(node, &mut diagnostics);
        (verdict, diagnostics.into_vec().len())
    }

    #[test]
    fn test_literals() {
        assert_eq!(resolve("1.0 + 1"), (true, 0));
        assert_eq!(resolve("1 + 2"), (false, 0));
    }

    #[test]
    fn test_variables() {
        assert!(resolve("1 > f").0);
        assert!(resolve("f > 1").0);
        assert!(!resolve("i > 1").0);
        assert!(!resolve("v * 2").0);
    }

    #[test]
    fn test_int_literal_follows_last_operand() {
        // `i` is the most recent operand when `2` is reached.
        assert!(resolve("f + i * 2").0);
        assert!(!resolve("i + i * 2").0);
    }

    #[test]
    fn test_field_selection() {
        assert!(resolve("v.x + 1").0);
        assert!(resolve("l.intensity * 2").0);
        assert!(!resolve("l.count * 2").0);
    }

    #[test]
    fn test_invalid_swizzle_is_diagnosed() {
        assert_eq!(resolve("v.z + 1"), (false, 1));
    }

    #[test]
    fn test_unresolved_identifier() {
        assert_eq!(resolve("missing + 1"), (false, 1));
        // Function names are not reported.
        assert_eq!(resolve("sin"), (false, 0));
    }

    #[test]
    fn test_calls_resolve_arguments_only() {
        assert!(resolve("max(i, f)").0);
        assert_eq!(resolve("v.length()"), (false, 0));
    }
}
