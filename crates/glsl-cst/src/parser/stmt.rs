//! Statements.

use alloc::{vec, vec::Vec};

use super::Parser;
use crate::{
    entity::NodeId,
    error::SyntaxResult,
    token::TokenKind,
    tree::{Child, NodeKind},
};

impl Parser {
    pub(super) fn parse_statement(&mut self) -> SyntaxResult<NodeId> {
        if self.check("{") {
            return self.parse_compound_statement();
        }
        if self.check("if") {
            return self.parse_selection_statement();
        }
        if self.check("switch") {
            return self.parse_switch_statement();
        }
        if self.check("case") || self.check("default") {
            return self.parse_case_label();
        }
        if self.check("while") {
            return self.parse_while_statement();
        }
        if self.check("do") {
            return self.parse_do_while_statement();
        }
        if self.check("for") {
            return self.parse_for_statement();
        }
        if self.check("return")
            || self.check("break")
            || self.check("continue")
            || self.check("discard")
        {
            return self.parse_jump_statement();
        }
        if self.at_declaration() {
            return self.parse_declaration(false);
        }
        self.parse_expression_statement()
    }

    /// Whether the statement starting here declares something.
    fn at_declaration(&self) -> bool {
        let token = self.peek();
        if token.is("struct") || token.is("precision") || token.is("layout") {
            return true;
        }
        if self.at_qualifier_nth(0) {
            return true;
        }
        if self.is_type_name(token) {
            return !self.check_nth(1, "(");
        }
        token.kind == TokenKind::Identifier && self.peek_nth(1).kind == TokenKind::Identifier
    }

    pub(super) fn parse_compound_statement(&mut self) -> SyntaxResult<NodeId> {
        let mut children = vec![Child::Token(self.expect("{")?)];
        while !self.check("}") && !self.is_at_end() {
            children.push(Child::Node(self.parse_statement()?));
        }
        children.push(Child::Token(self.expect("}")?));
        Ok(self.finish(NodeKind::CompoundStatement, children))
    }

    /// `if (cond) stmt [else stmt]`
    fn parse_selection_statement(&mut self) -> SyntaxResult<NodeId> {
        let mut children = Vec::new();
        self.bump(&mut children);
        self.parse_parenthesized_condition(&mut children)?;
        children.push(Child::Node(self.parse_statement()?));
        if self.check("else") {
            self.bump(&mut children);
            children.push(Child::Node(self.parse_statement()?));
        }
        Ok(self.finish(NodeKind::SelectionStatement, children))
    }

    fn parse_switch_statement(&mut self) -> SyntaxResult<NodeId> {
        let mut children = Vec::new();
        self.bump(&mut children);
        self.parse_parenthesized_condition(&mut children)?;
        children.push(Child::Node(self.parse_compound_statement()?));
        Ok(self.finish(NodeKind::SwitchStatement, children))
    }

    /// `case expr:` or `default:`
    fn parse_case_label(&mut self) -> SyntaxResult<NodeId> {
        let mut children = Vec::new();
        let is_case = self.check("case");
        self.bump(&mut children);
        if is_case {
            children.push(Child::Node(self.parse_expression()?));
        }
        children.push(Child::Token(self.expect(":")?));
        Ok(self.finish(NodeKind::CaseLabel, children))
    }

    fn parse_while_statement(&mut self) -> SyntaxResult<NodeId> {
        let mut children = Vec::new();
        self.bump(&mut children);
        self.parse_parenthesized_condition(&mut children)?;
        children.push(Child::Node(self.parse_statement()?));
        Ok(self.finish(NodeKind::WhileStatement, children))
    }

    fn parse_do_while_statement(&mut self) -> SyntaxResult<NodeId> {
        let mut children = Vec::new();
        self.bump(&mut children);
        children.push(Child::Node(self.parse_statement()?));
        children.push(Child::Token(self.expect("while")?));
        self.parse_parenthesized_condition(&mut children)?;
        children.push(Child::Token(self.expect(";")?));
        Ok(self.finish(NodeKind::DoWhileStatement, children))
    }

    /// `for (init; cond; step) stmt`
    fn parse_for_statement(&mut self) -> SyntaxResult<NodeId> {
        let mut children = Vec::new();
        self.bump(&mut children);
        children.push(Child::Token(self.expect("(")?));
        let init = if self.at_declaration() {
            self.parse_declaration(false)?
        } else {
            self.parse_expression_statement()?
        };
        children.push(Child::Node(init));
        if !self.check(";") {
            children.push(Child::Node(self.parse_expression()?));
        }
        children.push(Child::Token(self.expect(";")?));
        if !self.check(")") {
            children.push(Child::Node(self.parse_expression()?));
        }
        children.push(Child::Token(self.expect(")")?));
        children.push(Child::Node(self.parse_statement()?));
        Ok(self.finish(NodeKind::ForStatement, children))
    }

    fn parse_jump_statement(&mut self) -> SyntaxResult<NodeId> {
        let mut children = Vec::new();
        let is_return = self.check("return");
        self.bump(&mut children);
        if is_return && !self.check(";") {
            children.push(Child::Node(self.parse_expression()?));
        }
        children.push(Child::Token(self.expect(";")?));
        Ok(self.finish(NodeKind::JumpStatement, children))
    }

    fn parse_expression_statement(&mut self) -> SyntaxResult<NodeId> {
        let mut children = Vec::new();
        if !self.check(";") {
            children.push(Child::Node(self.parse_expression()?));
        }
        children.push(Child::Token(self.expect(";")?));
        Ok(self.finish(NodeKind::ExpressionStatement, children))
    }

    fn parse_parenthesized_condition(&mut self, children: &mut Vec<Child>) -> SyntaxResult<()> {
        children.push(Child::Token(self.expect("(")?));
        children.push(Child::Node(self.parse_expression()?));
        children.push(Child::Token(self.expect(")")?));
        Ok(())
    }
}
