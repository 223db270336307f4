//! Lossless GLSL syntax.
//!
//! This crate turns GLSL source text into a token stream and a concrete
//! syntax tree. Every token keeps its byte offsets into the source, and
//! whitespace, comments and preprocessor lines are left in the gaps between
//! tokens, so a consumer can stitch the original text back together exactly
//! while replacing individual tokens.

#![no_std]

extern crate alloc;

mod entity;
mod entity_map;
mod error;
mod lexer;
mod parser;
mod token;
mod tree;

pub use entity::{EntityRef, NodeId, TokenId};
pub use entity_map::{PrimaryMap, SecondaryMap};
pub use error::{SyntaxError, SyntaxResult};
pub use lexer::{tokenize, LineOffsets};
pub use parser::parse;
pub use token::{is_qualifier_keyword, is_type_keyword, Token, TokenKind, TokenStream};
pub use tree::{Child, NodeData, NodeKind, SyntaxTree};
