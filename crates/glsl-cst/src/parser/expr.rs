//! Expressions, by precedence climbing.

use alloc::{format, vec, vec::Vec};

use super::Parser;
use crate::{
    entity::NodeId,
    error::SyntaxResult,
    token::{Token, TokenKind},
    tree::{Child, NodeKind},
};

const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "<<=", ">>=", "&=", "^=", "|=",
];

const UNARY_OPERATORS: &[&str] = &["++", "--", "+", "-", "!", "~"];

/// Binding strength of a binary operator; higher binds tighter.
fn binary_precedence(token: &Token) -> Option<u8> {
    if token.kind != TokenKind::Punct {
        return None;
    }
    let precedence = match token.text.as_str() {
        "||" => 1,
        "^^" => 2,
        "&&" => 3,
        "|" => 4,
        "^" => 5,
        "&" => 6,
        "==" | "!=" => 7,
        "<" | ">" | "<=" | ">=" => 8,
        "<<" | ">>" => 9,
        "+" | "-" => 10,
        "*" | "/" | "%" => 11,
        _ => return None,
    };
    Some(precedence)
}

impl Parser {
    /// Comma-separated assignment expressions.
    pub(super) fn parse_expression(&mut self) -> SyntaxResult<NodeId> {
        let mut children = vec![Child::Node(self.parse_assignment()?)];
        while self.check(",") {
            self.bump(&mut children);
            children.push(Child::Node(self.parse_assignment()?));
        }
        Ok(self.finish(NodeKind::Expression, children))
    }

    /// Always produces an assignment node, with or without an operator, so
    /// every argument and initializer has one.
    pub(super) fn parse_assignment(&mut self) -> SyntaxResult<NodeId> {
        let lhs = self.parse_conditional()?;
        let mut children = vec![Child::Node(lhs)];
        let token = self.peek();
        if token.kind == TokenKind::Punct && ASSIGNMENT_OPERATORS.contains(&token.text.as_str()) {
            self.bump(&mut children);
            children.push(Child::Node(self.parse_assignment()?));
        }
        Ok(self.finish(NodeKind::AssignmentExpression, children))
    }

    pub(super) fn parse_conditional(&mut self) -> SyntaxResult<NodeId> {
        let condition = self.parse_binary(1)?;
        if !self.check("?") {
            return Ok(condition);
        }
        let mut children = vec![Child::Node(condition)];
        self.bump(&mut children);
        children.push(Child::Node(self.parse_expression()?));
        children.push(Child::Token(self.expect(":")?));
        children.push(Child::Node(self.parse_assignment()?));
        Ok(self.finish(NodeKind::ConditionalExpression, children))
    }

    fn parse_binary(&mut self, min_precedence: u8) -> SyntaxResult<NodeId> {
        let mut lhs = self.parse_unary()?;
        while let Some(precedence) = binary_precedence(self.peek()) {
            if precedence < min_precedence {
                break;
            }
            let op = self.advance();
            let rhs = self.parse_binary(precedence + 1)?;
            lhs = self.finish(
                NodeKind::BinaryExpression,
                vec![Child::Node(lhs), Child::Token(op), Child::Node(rhs)],
            );
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> SyntaxResult<NodeId> {
        let token = self.peek();
        if token.kind == TokenKind::Punct && UNARY_OPERATORS.contains(&token.text.as_str()) {
            let op = self.advance();
            let operand = self.parse_unary()?;
            return Ok(self.finish(
                NodeKind::UnaryExpression,
                vec![Child::Token(op), Child::Node(operand)],
            ));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> SyntaxResult<NodeId> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.check(".") {
                let dot = self.advance();
                let field = self.expect_identifier()?;
                expr = self.finish(
                    NodeKind::FieldSelection,
                    vec![Child::Node(expr), Child::Token(dot), Child::Token(field)],
                );
            } else if self.check("[") {
                let mut children = vec![Child::Node(expr)];
                self.bump(&mut children);
                children.push(Child::Node(self.parse_expression()?));
                children.push(Child::Token(self.expect("]")?));
                expr = self.finish(NodeKind::IndexExpression, children);
            } else if self.check("(") {
                expr = self.parse_call(Child::Node(expr))?;
            } else if self.check("++") || self.check("--") {
                let op = self.advance();
                expr = self.finish(
                    NodeKind::PostfixExpression,
                    vec![Child::Node(expr), Child::Token(op)],
                );
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> SyntaxResult<NodeId> {
        let kind = self.peek().kind;
        let is_type_name = self.is_type_name(self.peek());
        match kind {
            TokenKind::IntLiteral
            | TokenKind::UintLiteral
            | TokenKind::FloatLiteral
            | TokenKind::BoolLiteral => {
                let literal = self.advance();
                Ok(self.finish(NodeKind::PrimaryExpression, vec![Child::Token(literal)]))
            }
            TokenKind::Identifier if self.check_nth(1, "(") => {
                let callee = self.advance();
                self.parse_call(Child::Token(callee))
            }
            TokenKind::Identifier if !(is_type_name && self.check_nth(1, "[")) => {
                let name = self.advance();
                Ok(self.finish(NodeKind::PrimaryExpression, vec![Child::Token(name)]))
            }
            _ if is_type_name => {
                let constructor = self.parse_type_specifier()?;
                self.parse_call(Child::Node(constructor))
            }
            TokenKind::Punct if self.check("(") => {
                let mut children = Vec::new();
                self.bump(&mut children);
                children.push(Child::Node(self.parse_expression()?));
                children.push(Child::Token(self.expect(")")?));
                Ok(self.finish(NodeKind::ParenExpression, children))
            }
            _ => Err(self.error(format!(
                "expected expression, found {}",
                self.describe_current()
            ))),
        }
    }

    /// Argument list following `callee`.
    fn parse_call(&mut self, callee: Child) -> SyntaxResult<NodeId> {
        let mut children = vec![callee];
        children.push(Child::Token(self.expect("(")?));
        if self.check("void") && self.check_nth(1, ")") {
            self.bump(&mut children);
        } else if !self.check(")") {
            loop {
                children.push(Child::Node(self.parse_assignment()?));
                if !self.check(",") {
                    break;
                }
                self.bump(&mut children);
            }
        }
        children.push(Child::Token(self.expect(")")?));
        Ok(self.finish(NodeKind::FunctionCall, children))
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, vec::Vec};

    use crate::{entity::NodeId, parse, tree::NodeKind, SyntaxTree};

    /// The expression of `x = <expr>;` inside main, and its tree.
    fn rhs(expr: &str) -> (SyntaxTree, NodeId) {
        let tree = parse(&format!("void main() {{ x = {}; }}", expr)).unwrap();
        let def = tree.child_nodes(tree.root()).next().unwrap();
        let block = tree.find_child(def, NodeKind::CompoundStatement).unwrap();
        let statement = tree.child_nodes(block).next().unwrap();
        let expression = tree.child_nodes(statement).next().unwrap();
        let assignment = tree.child_nodes(expression).next().unwrap();
        let value = tree.child_nodes(assignment).nth(1).unwrap();
        let inner = tree.child_nodes(value).next().unwrap();
        (tree, inner)
    }

    #[test]
    fn test_precedence() {
        let (tree, node) = rhs("1 + 2 * 3");
        assert_eq!(tree.kind(node), NodeKind::BinaryExpression);
        let operands: Vec<_> = tree.child_nodes(node).map(|n| tree.kind(n)).collect();
        assert_eq!(
            operands,
            [NodeKind::PrimaryExpression, NodeKind::BinaryExpression]
        );
    }

    #[test]
    fn test_left_associative() {
        let (tree, node) = rhs("a - b - c");
        let lhs = tree.child_nodes(node).next().unwrap();
        assert_eq!(tree.kind(lhs), NodeKind::BinaryExpression);
        assert_eq!(tree.text(lhs), "a-b");
    }

    #[test]
    fn test_constructor_and_call() {
        let (tree, node) = rhs("vec2(1, f(2))");
        assert_eq!(tree.kind(node), NodeKind::FunctionCall);
        assert_eq!(tree.call_name(node).as_deref(), Some("vec2"));
        let args: Vec<_> = tree.call_arguments(node).collect();
        assert_eq!(args.len(), 2);
        assert_eq!(tree.text(args[1]), "f(2)");
    }

    #[test]
    fn test_postfix_chain() {
        let (tree, node) = rhs("lights[0].color.rgb");
        assert_eq!(tree.kind(node), NodeKind::FieldSelection);
        let base = tree.child_nodes(node).next().unwrap();
        assert_eq!(tree.kind(base), NodeKind::FieldSelection);
        let index = tree.child_nodes(base).next().unwrap();
        assert_eq!(tree.kind(index), NodeKind::IndexExpression);
    }

    #[test]
    fn test_method_call_has_no_name() {
        let (tree, node) = rhs("v.length()");
        assert_eq!(tree.kind(node), NodeKind::FunctionCall);
        assert_eq!(tree.call_name(node), None);
    }

    #[test]
    fn test_ternary() {
        let (tree, node) = rhs("c ? 1 : 2");
        assert_eq!(tree.kind(node), NodeKind::ConditionalExpression);
    }
}
