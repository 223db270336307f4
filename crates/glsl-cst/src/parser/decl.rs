//! Declarations, types and function prototypes.

use alloc::{format, vec, vec::Vec};

use log::trace;

use super::Parser;
use crate::{
    entity::NodeId,
    error::SyntaxResult,
    token::{is_contextual_qualifier, is_qualifier_keyword, TokenKind},
    tree::{Child, NodeKind},
};

impl Parser {
    pub(super) fn parse_external_declaration(&mut self) -> SyntaxResult<NodeId> {
        trace!("parse_external_declaration at {}", self.peek().text);
        self.parse_declaration(true)
    }

    /// Parse a declaration. At global scope `allow_definition` also accepts
    /// function definitions.
    pub(super) fn parse_declaration(&mut self, allow_definition: bool) -> SyntaxResult<NodeId> {
        if self.check(";") {
            let semi = self.advance();
            return Ok(self.finish(NodeKind::Declaration, vec![Child::Token(semi)]));
        }
        if self.check("precision") {
            return self.parse_precision_declaration();
        }
        if self.at_interface_block() {
            return self.parse_interface_block();
        }

        let ty = self.parse_fully_specified_type()?;
        if self.check_kind(TokenKind::Identifier) && self.check_nth(1, "(") {
            let prototype = self.parse_function_prototype(ty)?;
            if allow_definition && self.check("{") {
                let body = self.parse_compound_statement()?;
                return Ok(self.finish(
                    NodeKind::FunctionDefinition,
                    vec![Child::Node(prototype), Child::Node(body)],
                ));
            }
            let semi = self.expect(";")?;
            return Ok(self.finish(
                NodeKind::Declaration,
                vec![Child::Node(prototype), Child::Token(semi)],
            ));
        }

        let list = self.parse_init_declarator_list(ty)?;
        let semi = self.expect(";")?;
        Ok(self.finish(
            NodeKind::Declaration,
            vec![Child::Node(list), Child::Token(semi)],
        ))
    }

    /// `precision mediump float;`
    fn parse_precision_declaration(&mut self) -> SyntaxResult<NodeId> {
        let mut children = Vec::new();
        self.bump(&mut children);
        if self.check_kind(TokenKind::Keyword) && is_qualifier_keyword(&self.peek().text) {
            self.bump(&mut children);
        }
        children.push(Child::Node(self.parse_type_specifier()?));
        children.push(Child::Token(self.expect(";")?));
        Ok(self.finish(NodeKind::Declaration, children))
    }

    /// Qualifiers followed by a block name and `{`.
    fn at_interface_block(&self) -> bool {
        let mut n = 0;
        let mut qualified = false;
        loop {
            let token = self.peek_nth(n);
            if token.is("layout") {
                n = self.skip_parenthesized(n + 1);
                qualified = true;
            } else if self.at_qualifier_nth(n) {
                n += 1;
                qualified = true;
            } else {
                break;
            }
        }
        qualified
            && self.peek_nth(n).kind == TokenKind::Identifier
            && self.peek_nth(n + 1).is("{")
    }

    /// Index just past the parenthesized group starting at lookahead `n`.
    fn skip_parenthesized(&self, mut n: usize) -> usize {
        if !self.peek_nth(n).is("(") {
            return n;
        }
        let mut depth = 0usize;
        loop {
            let token = self.peek_nth(n);
            if token.kind == TokenKind::Eof {
                return n;
            }
            if token.is("(") {
                depth += 1;
            } else if token.is(")") {
                depth -= 1;
                if depth == 0 {
                    return n + 1;
                }
            }
            n += 1;
        }
    }

    fn parse_interface_block(&mut self) -> SyntaxResult<NodeId> {
        let mut children = Vec::new();
        self.parse_qualifiers(&mut children)?;
        let name = self.expect_identifier()?;
        self.declare_type_name(name);
        children.push(Child::Token(name));
        children.push(Child::Token(self.expect("{")?));
        while !self.check("}") && !self.is_at_end() {
            children.push(Child::Node(self.parse_struct_member()?));
        }
        children.push(Child::Token(self.expect("}")?));
        if self.check_kind(TokenKind::Identifier) {
            self.bump(&mut children);
            while self.check("[") {
                children.push(Child::Node(self.parse_array_specifier()?));
            }
        }
        let block = self.finish(NodeKind::InterfaceBlock, children);
        let semi = self.expect(";")?;
        Ok(self.finish(
            NodeKind::Declaration,
            vec![Child::Node(block), Child::Token(semi)],
        ))
    }

    /// Storage, precision, interpolation and layout qualifiers, in any order.
    fn parse_qualifiers(&mut self, children: &mut Vec<Child>) -> SyntaxResult<()> {
        loop {
            if self.check("layout") {
                children.push(Child::Node(self.parse_layout_qualifier()?));
            } else if self.at_qualifier_nth(0) {
                self.bump(children);
            } else {
                return Ok(());
            }
        }
    }

    /// Whether lookahead `n` is a qualifier other than `layout`.
    ///
    /// Late-version qualifiers such as `sample` or `buffer` are identifiers
    /// and only count when another qualifier or a type follows them.
    pub(super) fn at_qualifier_nth(&self, n: usize) -> bool {
        let token = self.peek_nth(n);
        match token.kind {
            TokenKind::Keyword => is_qualifier_keyword(&token.text),
            TokenKind::Identifier => {
                is_contextual_qualifier(&token.text)
                    && !self.is_type_name(token)
                    && matches!(
                        self.peek_nth(n + 1).kind,
                        TokenKind::Keyword | TokenKind::Identifier
                    )
            }
            _ => false,
        }
    }

    /// `layout(location = 0, std140)`
    fn parse_layout_qualifier(&mut self) -> SyntaxResult<NodeId> {
        let mut children = Vec::new();
        self.bump(&mut children);
        children.push(Child::Token(self.expect("(")?));
        while !self.check(")") && !self.is_at_end() {
            if self.check("=") {
                self.bump(&mut children);
                children.push(Child::Node(self.parse_conditional()?));
            } else {
                self.bump(&mut children);
            }
        }
        children.push(Child::Token(self.expect(")")?));
        Ok(self.finish(NodeKind::LayoutQualifier, children))
    }

    pub(super) fn parse_fully_specified_type(&mut self) -> SyntaxResult<NodeId> {
        let mut children = Vec::new();
        self.parse_qualifiers(&mut children)?;
        children.push(Child::Node(self.parse_type_specifier()?));
        Ok(self.finish(NodeKind::FullySpecifiedType, children))
    }

    pub(super) fn parse_type_specifier(&mut self) -> SyntaxResult<NodeId> {
        let mut children = Vec::new();
        if self.check("struct") {
            children.push(Child::Node(self.parse_struct_specifier()?));
        } else if self.is_type_name(self.peek()) || self.check_kind(TokenKind::Identifier) {
            self.bump(&mut children);
        } else {
            return Err(self.error(format!(
                "expected type, found {}",
                self.describe_current()
            )));
        }
        while self.check("[") {
            children.push(Child::Node(self.parse_array_specifier()?));
        }
        Ok(self.finish(NodeKind::TypeSpecifier, children))
    }

    /// `[]` or `[size]`
    pub(super) fn parse_array_specifier(&mut self) -> SyntaxResult<NodeId> {
        let mut children = vec![Child::Token(self.expect("[")?)];
        if !self.check("]") {
            children.push(Child::Node(self.parse_conditional()?));
        }
        children.push(Child::Token(self.expect("]")?));
        Ok(self.finish(NodeKind::ArraySpecifier, children))
    }

    fn parse_struct_specifier(&mut self) -> SyntaxResult<NodeId> {
        let mut children = vec![Child::Token(self.expect("struct")?)];
        if self.check_kind(TokenKind::Identifier) {
            let name = self.advance();
            self.declare_type_name(name);
            children.push(Child::Token(name));
        }
        children.push(Child::Token(self.expect("{")?));
        while !self.check("}") && !self.is_at_end() {
            children.push(Child::Node(self.parse_struct_member()?));
        }
        children.push(Child::Token(self.expect("}")?));
        Ok(self.finish(NodeKind::StructSpecifier, children))
    }

    /// `highp vec3 a, b[2];`
    fn parse_struct_member(&mut self) -> SyntaxResult<NodeId> {
        let mut children = Vec::new();
        self.parse_qualifiers(&mut children)?;
        children.push(Child::Node(self.parse_type_specifier()?));
        loop {
            children.push(Child::Token(self.expect_identifier()?));
            while self.check("[") {
                children.push(Child::Node(self.parse_array_specifier()?));
            }
            if !self.check(",") {
                break;
            }
            self.bump(&mut children);
        }
        children.push(Child::Token(self.expect(";")?));
        Ok(self.finish(NodeKind::StructMember, children))
    }

    fn parse_function_prototype(&mut self, return_type: NodeId) -> SyntaxResult<NodeId> {
        let mut children = vec![Child::Node(return_type)];
        children.push(Child::Token(self.expect_identifier()?));
        children.push(Child::Token(self.expect("(")?));
        if self.check("void") && self.check_nth(1, ")") {
            self.bump(&mut children);
        } else if !self.check(")") {
            loop {
                children.push(Child::Node(self.parse_parameter_declaration()?));
                if !self.check(",") {
                    break;
                }
                self.bump(&mut children);
            }
        }
        children.push(Child::Token(self.expect(")")?));
        Ok(self.finish(NodeKind::FunctionPrototype, children))
    }

    /// `in highp vec2 uv`, `float`, `out float weights[4]`
    fn parse_parameter_declaration(&mut self) -> SyntaxResult<NodeId> {
        let mut children = Vec::new();
        self.parse_qualifiers(&mut children)?;
        children.push(Child::Node(self.parse_type_specifier()?));
        if self.check_kind(TokenKind::Identifier) {
            self.bump(&mut children);
            while self.check("[") {
                children.push(Child::Node(self.parse_array_specifier()?));
            }
        }
        Ok(self.finish(NodeKind::ParameterDeclaration, children))
    }

    fn parse_init_declarator_list(&mut self, ty: NodeId) -> SyntaxResult<NodeId> {
        let mut children = vec![Child::Node(ty)];
        if !self.check(";") {
            loop {
                children.push(Child::Node(self.parse_declarator()?));
                if !self.check(",") {
                    break;
                }
                self.bump(&mut children);
            }
        }
        Ok(self.finish(NodeKind::InitDeclaratorList, children))
    }

    fn parse_declarator(&mut self) -> SyntaxResult<NodeId> {
        let mut children = vec![Child::Token(self.expect_identifier()?)];
        while self.check("[") {
            children.push(Child::Node(self.parse_array_specifier()?));
        }
        if self.check("=") {
            self.bump(&mut children);
            children.push(Child::Node(self.parse_initializer()?));
        }
        Ok(self.finish(NodeKind::Declarator, children))
    }

    fn parse_initializer(&mut self) -> SyntaxResult<NodeId> {
        let mut children = Vec::new();
        if self.check("{") {
            self.bump(&mut children);
            while !self.check("}") && !self.is_at_end() {
                children.push(Child::Node(self.parse_initializer()?));
                if !self.check(",") {
                    break;
                }
                self.bump(&mut children);
            }
            children.push(Child::Token(self.expect("}")?));
        } else {
            children.push(Child::Node(self.parse_assignment()?));
        }
        Ok(self.finish(NodeKind::Initializer, children))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use crate::{entity::NodeId, parse, tree::NodeKind, SyntaxTree};

    fn first_decl(tree: &SyntaxTree) -> NodeId {
        tree.child_nodes(tree.root()).next().unwrap()
    }

    #[test]
    fn test_multiple_declarators() {
        let tree = parse("float a = 1, b, c[2];").unwrap();
        let list = tree
            .find_child(first_decl(&tree), NodeKind::InitDeclaratorList)
            .unwrap();
        let names: Vec<_> = tree
            .child_nodes(list)
            .filter(|n| tree.kind(*n) == NodeKind::Declarator)
            .map(|n| tree.identifier(n).unwrap().text.clone())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_prototype_declaration() {
        let tree = parse("float sin(float x);").unwrap();
        let decl = first_decl(&tree);
        assert_eq!(tree.kind(decl), NodeKind::Declaration);
        let proto = tree.find_child(decl, NodeKind::FunctionPrototype).unwrap();
        assert_eq!(tree.identifier(proto).unwrap().text, "sin");
        assert_eq!(tree.child_nodes(proto).count(), 2);
    }

    #[test]
    fn test_void_parameter_list() {
        let tree = parse("void main(void) {}").unwrap();
        let proto = tree
            .find_child(first_decl(&tree), NodeKind::FunctionPrototype)
            .unwrap();
        assert!(tree.find_child(proto, NodeKind::ParameterDeclaration).is_none());
    }

    #[test]
    fn test_struct_declares_type_name() {
        let tree = parse(
            "struct Light { vec3 color; float intensity; };\n\
             void main() { Light l; l.intensity = 1.0; }",
        )
        .unwrap();
        let decls: Vec<_> = tree.child_nodes(tree.root()).collect();
        assert_eq!(tree.kind(decls[0]), NodeKind::Declaration);
        assert_eq!(tree.kind(decls[1]), NodeKind::FunctionDefinition);

        let body = tree.find_child(decls[1], NodeKind::CompoundStatement).unwrap();
        let first_statement = tree.child_nodes(body).next().unwrap();
        assert_eq!(tree.kind(first_statement), NodeKind::Declaration);
    }

    #[test]
    fn test_struct_type_name() {
        let tree = parse("struct S { float a, b; } s;").unwrap();
        let list = tree
            .find_child(first_decl(&tree), NodeKind::InitDeclaratorList)
            .unwrap();
        let fst = tree.find_child(list, NodeKind::FullySpecifiedType).unwrap();
        let ts = tree.find_child(fst, NodeKind::TypeSpecifier).unwrap();
        assert_eq!(tree.type_name(ts), Some("S"));
    }

    #[test]
    fn test_interface_block() {
        let tree = parse("layout(std140) uniform Block { mat4 mvp; float t; } ubo;").unwrap();
        let block = tree
            .find_child(first_decl(&tree), NodeKind::InterfaceBlock)
            .unwrap();
        assert_eq!(
            tree.child_nodes(block)
                .filter(|n| tree.kind(*n) == NodeKind::StructMember)
                .count(),
            2
        );
    }

    #[test]
    fn test_precision_and_qualifiers() {
        let tree = parse(
            "precision mediump float;\n\
             layout(location = 0) in vec3 position;\n\
             invariant gl_Position;",
        )
        .unwrap();
        assert_eq!(tree.child_nodes(tree.root()).count(), 3);
    }

    #[test]
    fn test_late_qualifier_words_as_names() {
        let tree = parse("vec4 sample = vec4(1); float buffer;").unwrap();
        let names: Vec<_> = tree
            .child_nodes(tree.root())
            .map(|decl| {
                let list = tree.find_child(decl, NodeKind::InitDeclaratorList).unwrap();
                let declarator = tree.find_child(list, NodeKind::Declarator).unwrap();
                tree.identifier(declarator).unwrap().text.clone()
            })
            .collect();
        assert_eq!(names, ["sample", "buffer"]);
    }

    #[test]
    fn test_late_qualifiers_before_type() {
        let tree = parse("sample in vec2 uv;
buffer Data { float v; } data;").unwrap();
        let decls: Vec<_> = tree.child_nodes(tree.root()).collect();

        let list = tree.find_child(decls[0], NodeKind::InitDeclaratorList).unwrap();
        let fst = tree.find_child(list, NodeKind::FullySpecifiedType).unwrap();
        let qualifiers: Vec<_> = tree.child_tokens(fst).map(|t| t.text.as_str()).collect();
        assert_eq!(qualifiers, ["sample", "in"]);

        assert!(tree.find_child(decls[1], NodeKind::InterfaceBlock).is_some());
    }

    #[test]
    fn test_array_initializer_list() {
        let tree = parse("float w[3] = { 1, 2, 3 };").unwrap();
        let text = tree.text(tree.root());
        assert_eq!(text, "floatw[3]={1,2,3};");
    }
}
