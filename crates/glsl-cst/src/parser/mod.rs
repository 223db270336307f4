//! Recursive descent parser producing a [`SyntaxTree`].
//!
//! The parser accepts valid desktop GLSL and does no semantic checking. It
//! only remembers struct and interface block names so that declarations such
//! as `Light l;` can be told apart from expressions.

mod decl;
mod expr;
mod stmt;

use alloc::{
    collections::BTreeSet,
    format,
    string::{String, ToString},
    vec::Vec,
};

use log::trace;

use crate::{
    entity::{NodeId, TokenId},
    entity_map::PrimaryMap,
    error::{SyntaxError, SyntaxResult},
    lexer::tokenize,
    token::{is_type_keyword, Token, TokenKind, TokenStream},
    tree::{Child, NodeData, NodeKind, SyntaxTree},
};

/// Parse GLSL source into a syntax tree.
pub fn parse(source: &str) -> SyntaxResult<SyntaxTree> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).parse_translation_unit()
}

pub(crate) struct Parser {
    tokens: TokenStream,
    current: usize,
    nodes: PrimaryMap<NodeId, NodeData>,
    /// Struct and interface block names declared so far.
    type_names: BTreeSet<String>,
}

impl Parser {
    pub(crate) fn new(tokens: TokenStream) -> Self {
        Parser {
            tokens,
            current: 0,
            nodes: PrimaryMap::new(),
            type_names: BTreeSet::new(),
        }
    }

    pub(crate) fn parse_translation_unit(mut self) -> SyntaxResult<SyntaxTree> {
        trace!("parse_translation_unit: {} tokens", self.tokens.len());
        let mut children = Vec::new();
        while !self.is_at_end() {
            children.push(Child::Node(self.parse_external_declaration()?));
        }
        let root = self.finish(NodeKind::TranslationUnit, children);
        Ok(SyntaxTree::new(self.tokens, self.nodes, root))
    }

    // Helper methods

    fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    /// Look `n` tokens ahead. Past the end this keeps returning end of input.
    fn peek_nth(&self, n: usize) -> &Token {
        let tokens = self.tokens.as_slice();
        &tokens[(self.current + n).min(tokens.len() - 1)]
    }

    fn check(&self, text: &str) -> bool {
        self.peek().is(text)
    }

    fn check_nth(&self, n: usize, text: &str) -> bool {
        self.peek_nth(n).is(text)
    }

    fn check_kind(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn is_at_end(&self) -> bool {
        self.check_kind(TokenKind::Eof)
    }

    fn advance(&mut self) -> TokenId {
        let id = self.peek().index;
        if !self.is_at_end() {
            self.current += 1;
        }
        id
    }

    /// Consume the current token into `children`.
    fn bump(&mut self, children: &mut Vec<Child>) {
        children.push(Child::Token(self.advance()));
    }

    fn expect(&mut self, text: &str) -> SyntaxResult<TokenId> {
        if self.check(text) {
            Ok(self.advance())
        } else {
            Err(self.error(format!("expected '{}', found {}", text, self.describe_current())))
        }
    }

    fn expect_identifier(&mut self) -> SyntaxResult<TokenId> {
        if self.check_kind(TokenKind::Identifier) {
            Ok(self.advance())
        } else {
            Err(self.error(format!("expected identifier, found {}", self.describe_current())))
        }
    }

    fn describe_current(&self) -> String {
        match self.peek().kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", self.peek().text),
        }
    }

    fn error(&self, message: String) -> SyntaxError {
        let token = self.peek();
        SyntaxError::new(token.line, token.column, message)
    }

    /// Whether `token` names a type: a builtin type keyword or a declared
    /// struct or block name.
    fn is_type_name(&self, token: &Token) -> bool {
        match token.kind {
            TokenKind::Keyword => is_type_keyword(&token.text),
            TokenKind::Identifier => self.type_names.contains(&token.text),
            _ => false,
        }
    }

    fn declare_type_name(&mut self, token: TokenId) {
        let name = self.tokens[token].text.clone();
        trace!("declared type name {}", name);
        self.type_names.insert(name);
    }

    /// Allocate a node over `children` and adopt them.
    fn finish(&mut self, kind: NodeKind, children: Vec<Child>) -> NodeId {
        let eof = self.tokens.eof().index;
        let first_token = children.first().map_or(eof, |child| self.first_token_of(*child));
        let last_token = children.last().map_or(eof, |child| self.last_token_of(*child));
        let adopted: Vec<NodeId> = children
            .iter()
            .filter_map(|child| match child {
                Child::Node(node) => Some(*node),
                Child::Token(_) => None,
            })
            .collect();

        let id = self.nodes.push(NodeData {
            kind,
            parent: None,
            children,
            first_token,
            last_token,
        });
        for child in adopted {
            self.nodes[child].parent = Some(id);
        }
        id
    }

    fn first_token_of(&self, child: Child) -> TokenId {
        match child {
            Child::Node(node) => self.nodes[node].first_token,
            Child::Token(token) => token,
        }
    }

    fn last_token_of(&self, child: Child) -> TokenId {
        match child {
            Child::Node(node) => self.nodes[node].last_token,
            Child::Token(token) => token,
        }
    }
}
