//! Top-down float context propagation and rewrite planning.
//!
//! The planner walks the syntax tree once, in source order. The float
//! context flows down as an explicit parameter and is stamped into a map for
//! every visited node. Declarations, assignments and calls compute a fresh
//! context for their operands; everything else inherits its parent's.
//! Integer literals that end up in a float context are planned for rewrite
//! to `N.0`, and user functions that re-declare a builtin are planned for
//! deletion.
//!
//! Symbols are collected during the same walk, so a call only sees functions
//! defined or prototyped before it.

mod calls;
mod overrides;

use alloc::{format, string::String, vec::Vec};

use glsl_cst::{Child, NodeId, NodeKind, SecondaryMap, SyntaxTree, Token, TokenKind};
use log::{debug, trace};

use self::{
    calls::{argument_float_flags, infer_argument_type, ArgumentType},
    overrides::{is_builtin_override, read_prototype, Prototype},
};
use crate::{
    builtins::Catalog,
    diagnostics::{Diagnostic, Diagnostics},
    resolve::ContextResolver,
    rewrite::ReplacementPlan,
    symbols::{FunctionSignature, SymbolTable, Variable},
    types::{GlslType, StructType},
    typing::static_type,
};

const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "<<=", ">>=", "&=", "^=", "|=",
];

/// Whether an assignment expression is a call argument, and if so whether
/// the matched parameter is `float`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgumentContext {
    None,
    Argument { expects_float: bool },
}

/// Result of planning one translation unit.
#[derive(Debug)]
pub struct PlanOutput {
    pub plan: ReplacementPlan,
    pub diagnostics: Vec<Diagnostic>,
    float_context: SecondaryMap<NodeId, bool>,
}

impl PlanOutput {
    /// Whether `node` was visited in a float context. Unvisited nodes are
    /// not.
    pub fn in_float_context(&self, node: NodeId) -> bool {
        self.float_context.get(node).copied().unwrap_or(false)
    }
}

/// Plans the rewrite of one parsed translation unit.
pub struct RewritePlanner<'a, 'c> {
    tree: &'a SyntaxTree,
    symbols: SymbolTable<'c>,
    float_context: SecondaryMap<NodeId, bool>,
    plan: ReplacementPlan,
    diagnostics: Diagnostics,
}

impl<'a, 'c> RewritePlanner<'a, 'c> {
    pub fn new(tree: &'a SyntaxTree, catalog: &'c Catalog) -> Self {
        RewritePlanner {
            tree,
            symbols: SymbolTable::new(catalog),
            float_context: SecondaryMap::with_capacity(tree.len()),
            plan: ReplacementPlan::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn plan(mut self) -> PlanOutput {
        let root = self.tree.root();
        self.visit(root, false);
        trace!("planned {} replacements", self.plan.len());
        PlanOutput {
            plan: self.plan,
            diagnostics: self.diagnostics.into_vec(),
            float_context: self.float_context,
        }
    }

    fn visit(&mut self, node: NodeId, context: bool) {
        let tree = self.tree;
        let kind = tree.kind(node);
        let context = match kind {
            NodeKind::ArraySpecifier | NodeKind::LayoutQualifier => false,
            _ => context,
        };

        match kind {
            NodeKind::AssignmentExpression => {
                self.visit_assignment(node, context, ArgumentContext::None)
            }
            NodeKind::FunctionDefinition => {
                self.stamp(node, context);
                self.visit_function_definition(node);
            }
            NodeKind::Declaration => {
                self.stamp(node, context);
                self.visit_declaration(node);
            }
            NodeKind::InitDeclaratorList => {
                self.stamp(node, context);
                self.visit_init_declarator_list(node);
            }
            NodeKind::StructSpecifier => {
                self.stamp(node, context);
                self.visit_children(node, false);
                let ty = self.struct_type(node);
                self.symbols.declare_struct(ty);
            }
            NodeKind::InterfaceBlock => {
                self.stamp(node, context);
                self.visit_interface_block(node);
            }
            NodeKind::CompoundStatement | NodeKind::ForStatement => {
                self.stamp(node, context);
                self.symbols.push_scope();
                self.visit_children(node, context);
                self.symbols.pop_scope();
            }
            NodeKind::FunctionCall => {
                self.stamp(node, context);
                self.visit_call(node);
            }
            NodeKind::IndexExpression => {
                self.stamp(node, context);
                for child in tree.children(node) {
                    match child {
                        Child::Node(n) if tree.kind(*n) == NodeKind::Expression => {
                            self.visit(*n, false)
                        }
                        Child::Node(n) => self.visit(*n, context),
                        Child::Token(_) => {}
                    }
                }
            }
            _ => {
                self.stamp(node, context);
                self.visit_children(node, context);
            }
        }
    }

    fn stamp(&mut self, node: NodeId, context: bool) {
        self.float_context.insert(node, context);
    }

    /// Visit every child in order. Integer literal tokens directly under a
    /// float context node are promoted.
    fn visit_children(&mut self, node: NodeId, context: bool) {
        let tree = self.tree;
        for child in tree.children(node) {
            match child {
                Child::Node(n) => self.visit(*n, context),
                Child::Token(t) if context => self.promote_literal(tree.token(*t)),
                Child::Token(_) => {}
            }
        }
    }

    fn promote_literal(&mut self, token: &Token) {
        if token.kind != TokenKind::IntLiteral {
            return;
        }
        let text = token.text.as_str();
        if text.starts_with("0x") || text.starts_with("0X") || (text.len() > 1 && text.starts_with('0'))
        {
            debug!(
                "{}:{}: leaving non-decimal literal {} as is",
                token.line, token.column, text
            );
            return;
        }
        trace!("{}:{}: {} -> {}.0", token.line, token.column, text, text);
        self.plan.replace(token.index, format!("{}.0", text));
    }

    fn visit_assignment(&mut self, node: NodeId, inherited: bool, argument: ArgumentContext) {
        let tree = self.tree;
        let (mut local, is_argument) = match argument {
            ArgumentContext::None => (false, false),
            ArgumentContext::Argument { expects_float } => (expects_float, true),
        };

        let has_operator = tree
            .child_tokens(node)
            .any(|t| t.kind == TokenKind::Punct && ASSIGNMENT_OPERATORS.contains(&t.text.as_str()));
        if !local && has_operator {
            if let Some(lhs) = tree.child_nodes(node).next() {
                local = static_type(tree, &self.symbols, lhs, &mut self.diagnostics)
                    .is_some_and(|ty| ty.is_float_scalar_or_vector());
            }
        }
        if !local {
            local = ContextResolver::new(tree, &self.symbols).resolve(node, &mut self.diagnostics);
        }

        let context = (inherited && !is_argument) || local;
        self.stamp(node, context);
        self.visit_children(node, context);
    }

    fn visit_call(&mut self, call: NodeId) {
        let tree = self.tree;
        let arguments: Vec<NodeId> = tree.call_arguments(call).collect();
        let flags = tree.call_name(call).and_then(|name| {
            let types: Vec<ArgumentType> = arguments
                .iter()
                .map(|arg| infer_argument_type(tree, &self.symbols, *arg))
                .collect();
            argument_float_flags(&self.symbols, &name, &types)
        });

        let mut index = 0;
        for child in tree.child_nodes(call) {
            if tree.kind(child) == NodeKind::AssignmentExpression {
                let expects_float = flags
                    .as_ref()
                    .and_then(|flags| flags.get(index).copied())
                    .unwrap_or(false);
                index += 1;
                self.visit_assignment(child, false, ArgumentContext::Argument { expects_float });
            } else {
                // The callee: a type specifier or a method's receiver.
                self.visit(child, false);
            }
        }
    }

    fn visit_function_definition(&mut self, definition: NodeId) {
        let tree = self.tree;
        let Some(prototype_node) = tree.find_child(definition, NodeKind::FunctionPrototype) else {
            return;
        };
        let Some(prototype) = read_prototype(tree, prototype_node) else {
            return;
        };
        if is_builtin_override(self.symbols.catalog(), &prototype) {
            debug!(
                "deleting definition of builtin {} at {}:{}",
                prototype.name.text, prototype.name.line, prototype.name.column
            );
            let (first, last) = tree.token_range(definition);
            self.plan.delete_range(first, last);
            return;
        }

        self.symbols.push_scope();
        let params = self.declare_parameters(&prototype);
        let return_type = self.return_type(&prototype);
        self.symbols.declare_function(FunctionSignature::new(
            prototype.name.text.clone(),
            return_type,
            params,
        ));
        self.visit(prototype_node, false);
        if let Some(body) = tree.find_child(definition, NodeKind::CompoundStatement) {
            // Parameters and body locals share one scope.
            self.stamp(body, false);
            self.visit_children(body, false);
        }
        self.symbols.pop_scope();
    }

    /// Declare the parameters in the current scope and return their types.
    fn declare_parameters(&mut self, prototype: &Prototype<'_>) -> Vec<GlslType> {
        let mut types = Vec::with_capacity(prototype.params.len());
        for param in &prototype.params {
            let ty = param
                .type_name
                .and_then(|name| self.symbols.lookup_type(name))
                .unwrap_or_else(|| {
                    self.diagnostics.report(
                        param.type_token,
                        format!("unknown parameter type '{}', assuming float", param.type_text),
                    );
                    GlslType::primitive("float")
                });
            if let Some(name) = param.name {
                self.symbols.declare(Variable {
                    name: name.text.clone(),
                    ty: ty.clone(),
                    is_array: param.is_array,
                });
            }
            types.push(ty);
        }
        types
    }

    fn return_type(&self, prototype: &Prototype<'_>) -> GlslType {
        self.symbols
            .lookup_type(&prototype.return_type)
            .unwrap_or_else(|| GlslType::primitive(prototype.return_type.as_str()))
    }

    fn visit_declaration(&mut self, declaration: NodeId) {
        let tree = self.tree;
        let Some(prototype_node) = tree.find_child(declaration, NodeKind::FunctionPrototype) else {
            self.visit_children(declaration, false);
            return;
        };
        let Some(prototype) = read_prototype(tree, prototype_node) else {
            return;
        };
        if is_builtin_override(self.symbols.catalog(), &prototype) {
            debug!(
                "deleting prototype of builtin {} at {}:{}",
                prototype.name.text, prototype.name.line, prototype.name.column
            );
            let (first, last) = tree.token_range(declaration);
            self.plan.delete_range(first, last);
            return;
        }

        let params = prototype
            .params
            .iter()
            .map(|param| {
                param
                    .type_name
                    .and_then(|name| self.symbols.lookup_type(name))
                    .unwrap_or_else(|| GlslType::primitive("float"))
            })
            .collect();
        let return_type = self.return_type(&prototype);
        self.symbols.declare_function(FunctionSignature::new(
            prototype.name.text.clone(),
            return_type,
            params,
        ));
        self.visit_children(declaration, false);
    }

    fn visit_init_declarator_list(&mut self, list: NodeId) {
        let tree = self.tree;
        let mut declared: Option<GlslType> = None;
        let mut type_is_array = false;
        for child in tree.child_nodes(list) {
            match tree.kind(child) {
                NodeKind::FullySpecifiedType => {
                    self.visit(child, false);
                    if let Some(specifier) = tree.find_child(child, NodeKind::TypeSpecifier) {
                        type_is_array = tree.has_array_specifier(specifier);
                        declared = self.specified_type(specifier);
                    }
                }
                NodeKind::Declarator => {
                    self.visit_declarator(child, declared.as_ref(), type_is_array)
                }
                _ => self.visit(child, false),
            }
        }
    }

    /// Walk a declarator's initializer in the declared type's context, then
    /// declare the variable.
    fn visit_declarator(&mut self, declarator: NodeId, ty: Option<&GlslType>, type_is_array: bool) {
        let tree = self.tree;
        let context = ty.is_some_and(GlslType::is_float);
        self.stamp(declarator, context);
        self.visit_children(declarator, context);

        let (Some(ty), Some(name)) = (ty, tree.identifier(declarator)) else {
            return;
        };
        self.symbols.declare(Variable {
            name: name.text.clone(),
            ty: ty.clone(),
            is_array: type_is_array || tree.has_array_specifier(declarator),
        });
    }

    /// Type named by a type specifier. Unknown names are reported.
    fn specified_type(&mut self, specifier: NodeId) -> Option<GlslType> {
        let tree = self.tree;
        if let Some(structure) = tree.find_child(specifier, NodeKind::StructSpecifier) {
            return Some(self.struct_type(structure));
        }
        let name = tree.type_name(specifier)?;
        let ty = self.symbols.lookup_type(name);
        if ty.is_none() {
            let (first, _) = tree.token_range(specifier);
            self.diagnostics
                .report(tree.token(first), format!("unknown type '{}'", name));
        }
        ty
    }

    /// Build the type declared by a struct specifier. Anonymous structs get
    /// an empty name.
    fn struct_type(&mut self, specifier: NodeId) -> GlslType {
        let tree = self.tree;
        let name = tree
            .identifier(specifier)
            .map(|t| t.text.clone())
            .unwrap_or_default();
        let mut structure = StructType::new(name);
        for member in tree.child_nodes(specifier) {
            self.add_members(&mut structure, member);
        }
        structure.into()
    }

    /// Add the fields of one `StructMember` node.
    fn add_members(&mut self, structure: &mut StructType, member: NodeId) {
        let tree = self.tree;
        if tree.kind(member) != NodeKind::StructMember {
            return;
        }
        let Some(specifier) = tree.find_child(member, NodeKind::TypeSpecifier) else {
            return;
        };
        let Some(ty) = self.specified_type(specifier) else {
            return;
        };
        for field in tree.child_tokens(member) {
            if field.kind == TokenKind::Identifier {
                structure.add_field(field.text.clone(), ty.clone());
            }
        }
    }

    fn visit_interface_block(&mut self, block: NodeId) {
        let tree = self.tree;
        self.visit_children(block, false);

        let tokens: Vec<_> = tree.child_tokens(block).collect();
        // Qualifiers such as `buffer` may also be identifiers, so the block
        // name is the one right before `{`.
        let Some(open) = tokens.iter().position(|t| t.is("{")) else {
            return;
        };
        let Some(block_name) = open
            .checked_sub(1)
            .map(|i| tokens[i])
            .filter(|t| t.kind == TokenKind::Identifier)
        else {
            return;
        };
        let instance = tokens[open..]
            .iter()
            .copied()
            .find(|t| t.kind == TokenKind::Identifier);

        let mut structure = StructType::new(block_name.text.clone());
        for member in tree.child_nodes(block) {
            self.add_members(&mut structure, member);
        }

        match instance {
            Some(instance) => {
                let ty = GlslType::from(structure);
                self.symbols.declare_struct(ty.clone());
                self.symbols.declare(Variable {
                    name: instance.text.clone(),
                    ty,
                    is_array: tree.has_array_specifier(block),
                });
            }
            None => {
                for member in tree.child_nodes(block) {
                    self.declare_block_members(member);
                }
                self.symbols.declare_struct(structure.into());
            }
        }
    }

    /// Members of an unnamed block instance are globals.
    fn declare_block_members(&mut self, member: NodeId) {
        let tree = self.tree;
        if tree.kind(member) != NodeKind::StructMember {
            return;
        }
        let Some(specifier) = tree.find_child(member, NodeKind::TypeSpecifier) else {
            return;
        };
        let Some(ty) = tree
            .type_name(specifier)
            .and_then(|name| self.symbols.lookup_type(name))
        else {
            return;
        };
        let type_is_array = tree.has_array_specifier(specifier);

        // A name is declared once the `,` or `;` after its dimensions is seen.
        let mut pending: Option<(String, bool)> = None;
        for child in tree.children(member) {
            match child {
                Child::Token(t) if tree.token(*t).kind == TokenKind::Identifier => {
                    pending = Some((tree.token(*t).text.clone(), type_is_array));
                }
                Child::Token(_) => {
                    if let Some((name, is_array)) = pending.take() {
                        self.symbols.declare(Variable {
                            name,
                            ty: ty.clone(),
                            is_array,
                        });
                    }
                }
                Child::Node(n) if tree.kind(*n) == NodeKind::ArraySpecifier => {
                    if let Some((_, is_array)) = pending.as_mut() {
                        *is_array = true;
                    }
                }
                Child::Node(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec::Vec};

    use glsl_cst::{parse, EntityRef};

    use super::*;

    fn plan(source: &str) -> (SyntaxTree, PlanOutput) {
        let tree = parse(source).unwrap();
        let output = RewritePlanner::new(&tree, Catalog::builtin().unwrap()).plan();
        (tree, output)
    }

    /// Replacement texts in token order.
    fn replacements(source: &str) -> Vec<(String, String)> {
        let (tree, output) = plan(source);
        output
            .plan
            .iter()
            .map(|(token, text)| (tree.token(token).text.clone(), text.to_string()))
            .collect()
    }

    fn pair(from: &str, to: &str) -> (String, String) {
        (from.to_string(), to.to_string())
    }

    #[test]
    fn test_float_declaration() {
        assert_eq!(replacements("float x = 1;"), [pair("1", "1.0")]);
        assert!(replacements("int y = 1;").is_empty());
    }

    #[test]
    fn test_every_declarator_in_list() {
        assert_eq!(
            replacements("float a = 1, b = 2;"),
            [pair("1", "1.0"), pair("2", "2.0")]
        );
    }

    #[test]
    fn test_initializer_sees_outer_binding() {
        // Inside the initializer `s` is still the global float.
        let source = "float s = 1.0; void main() { int s = int(s * 2); }";
        assert_eq!(replacements(source), [pair("2", "2.0")]);
    }

    #[test]
    fn test_index_and_array_size_stay_integer() {
        assert!(replacements("float w[2]; void main() { w[1] = 2.0; }").is_empty());
        assert_eq!(
            replacements("float w[2]; void main() { w[1] = 2; }"),
            [pair("2", "2.0")]
        );
    }

    #[test]
    fn test_non_decimal_literals_are_kept() {
        assert!(replacements("float x = 0x10; float y = 010;").is_empty());
        assert_eq!(replacements("float z = 0;"), [pair("0", "0.0")]);
    }

    #[test]
    fn test_float_context_map() {
        let (tree, output) = plan("float x = 1; int y = 2;");
        let declarators: Vec<_> = (0..tree.len())
            .map(NodeId::from_index)
            .filter(|n| tree.kind(*n) == NodeKind::Declarator)
            .collect();
        assert_eq!(declarators.len(), 2);
        assert!(output.in_float_context(declarators[0]));
        assert!(!output.in_float_context(declarators[1]));
        assert!(!output.in_float_context(tree.root()));
    }

    #[test]
    fn test_override_deletes_whole_definition() {
        let (tree, output) = plan("float sin(float x) { return x; }\nvoid main() {}");
        let deleted: Vec<_> = output.plan.iter().map(|(t, _)| tree.token(t).text.clone()).collect();
        assert_eq!(
            deleted,
            ["float", "sin", "(", "float", "x", ")", "{", "return", "x", ";", "}"]
        );
        assert!(output.plan.iter().all(|(_, text)| text.is_empty()));
    }

    #[test]
    fn test_unknown_parameter_type_is_diagnosed() {
        let (_, output) = plan("float f(Missing m) { return 1.0; }");
        assert_eq!(output.diagnostics.len(), 1);
        assert!(output.diagnostics[0].message.contains("Missing"));
    }

    #[test]
    fn test_interface_block_members() {
        let source = "uniform Params { float scale; int count; };\n\
                      uniform Other { float gain; } other;\n\
                      void main() {\n\
                          int a = int(scale * 2);\n\
                          int b = int(other.gain * 3);\n\
                          int c = count * 4;\n\
                      }";
        assert_eq!(replacements(source), [pair("2", "2.0"), pair("3", "3.0")]);
        assert!(plan(source).1.diagnostics.is_empty());
    }
}
