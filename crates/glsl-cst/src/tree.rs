//! Concrete syntax tree.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Leaves are
//! tokens, referenced by [`TokenId`] into the tree's [`TokenStream`]. Every
//! token of the source appears as exactly one leaf, so a node's tokens are
//! the contiguous range `first_token..=last_token`.

use alloc::{string::String, vec::Vec};

use crate::{
    entity::{EntityRef, NodeId, TokenId},
    entity_map::PrimaryMap,
    token::{Token, TokenKind, TokenStream},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    TranslationUnit,
    FunctionDefinition,
    /// Return type, name and parameter list.
    FunctionPrototype,
    ParameterDeclaration,
    /// Anything terminated by `;` at declaration level, including prototypes,
    /// precision statements and interface blocks.
    Declaration,
    /// A type followed by zero or more declarators.
    InitDeclaratorList,
    /// A declared name with optional array dimensions and initializer.
    Declarator,
    InterfaceBlock,
    /// Qualifiers followed by a type specifier.
    FullySpecifiedType,
    LayoutQualifier,
    /// A type name or struct specifier, with optional array dimensions.
    TypeSpecifier,
    ArraySpecifier,
    StructSpecifier,
    StructMember,
    Initializer,
    CompoundStatement,
    ExpressionStatement,
    SelectionStatement,
    SwitchStatement,
    CaseLabel,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    JumpStatement,
    /// Comma-separated assignment expressions.
    Expression,
    /// An assignment, or a lone conditional expression in assignment position.
    AssignmentExpression,
    ConditionalExpression,
    BinaryExpression,
    UnaryExpression,
    /// `x++` and `x--`.
    PostfixExpression,
    FieldSelection,
    IndexExpression,
    /// Function or constructor call. The first child is the callee: an
    /// identifier token, a type specifier for constructors, or a field
    /// selection for method calls.
    FunctionCall,
    /// A literal or variable reference.
    PrimaryExpression,
    ParenExpression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    Node(NodeId),
    Token(TokenId),
}

#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<Child>,
    pub first_token: TokenId,
    pub last_token: TokenId,
}

/// A parsed translation unit together with the tokens it was built from.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    tokens: TokenStream,
    nodes: PrimaryMap<NodeId, NodeData>,
    root: NodeId,
}

impl SyntaxTree {
    pub(crate) fn new(tokens: TokenStream, nodes: PrimaryMap<NodeId, NodeData>, root: NodeId) -> Self {
        SyntaxTree {
            tokens,
            nodes,
            root,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id]
    }

    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id]
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[Child] {
        &self.nodes[id].children
    }

    /// Direct child nodes, skipping tokens
    pub fn child_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).iter().filter_map(|child| match child {
            Child::Node(node) => Some(*node),
            Child::Token(_) => None,
        })
    }

    /// Direct child tokens, skipping nodes
    pub fn child_tokens(&self, id: NodeId) -> impl Iterator<Item = &Token> + '_ {
        self.children(id).iter().filter_map(move |child| match child {
            Child::Node(_) => None,
            Child::Token(token) => Some(&self.tokens[*token]),
        })
    }

    /// First direct child node of the given kind
    pub fn find_child(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.child_nodes(id).find(|child| self.kind(*child) == kind)
    }

    /// First direct child token that is an identifier
    pub fn identifier(&self, id: NodeId) -> Option<&Token> {
        self.child_tokens(id)
            .find(|token| token.kind == TokenKind::Identifier)
    }

    /// Tokens covered by the node, first to last inclusive
    pub fn token_range(&self, id: NodeId) -> (TokenId, TokenId) {
        let node = &self.nodes[id];
        (node.first_token, node.last_token)
    }

    /// Concatenated token text of the node, without the whitespace between
    /// tokens.
    pub fn text(&self, id: NodeId) -> String {
        let (first, last) = self.token_range(id);
        let mut text = String::new();
        for index in first.index()..=last.index() {
            let token = &self.tokens[TokenId::from_index(index)];
            if token.kind != TokenKind::Eof {
                text.push_str(&token.text);
            }
        }
        text
    }

    /// Name of the function or type a call invokes.
    ///
    /// `None` for method calls such as `v.length()`.
    pub fn call_name(&self, call: NodeId) -> Option<String> {
        match self.children(call).first()? {
            Child::Token(token) => Some(self.tokens[*token].text.clone()),
            Child::Node(callee) if self.kind(*callee) == NodeKind::TypeSpecifier => {
                Some(self.type_name(*callee)?.into())
            }
            Child::Node(_) => None,
        }
    }

    /// Argument expressions of a call, in order
    pub fn call_arguments(&self, call: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.child_nodes(call)
            .filter(|child| self.kind(*child) == NodeKind::AssignmentExpression)
    }

    /// Base type name of a type specifier, ignoring array dimensions.
    ///
    /// For struct specifiers this is the struct's name, or `None` when the
    /// struct is anonymous.
    pub fn type_name(&self, type_specifier: NodeId) -> Option<&str> {
        match self.children(type_specifier).first()? {
            Child::Token(token) => Some(&self.tokens[*token].text),
            Child::Node(spec) => self.identifier(*spec).map(|token| token.text.as_str()),
        }
    }

    /// Whether a declarator, parameter or type specifier carries array
    /// dimensions.
    pub fn has_array_specifier(&self, id: NodeId) -> bool {
        self.find_child(id, NodeKind::ArraySpecifier).is_some()
    }
}
