//! Tokens and the token stream.

use alloc::{string::String, vec::Vec};
use core::ops::Index;

use crate::entity::{EntityRef, TokenId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    /// Reserved word, including type names such as `float` or `vec3`.
    Keyword,
    /// Signed integer literal: decimal, octal or hexadecimal.
    IntLiteral,
    /// Integer literal with a `u`/`U` suffix.
    UintLiteral,
    FloatLiteral,
    BoolLiteral,
    /// Operator or punctuation.
    Punct,
    /// End of input. Always the last token of a stream and never emitted.
    Eof,
}

/// A single token.
///
/// `start..end` is the byte range of the token in the source it was lexed
/// from. `line` and `column` are 1-based and point at `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub index: TokenId,
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
    pub text: String,
}

impl Token {
    /// Whether this is the given keyword or punctuation.
    pub fn is(&self, text: &str) -> bool {
        matches!(self.kind, TokenKind::Keyword | TokenKind::Punct) && self.text == text
    }
}

/// Ordered tokens of one source text, terminated by an [`TokenKind::Eof`] token.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof));
        TokenStream { tokens }
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id.index())
    }

    /// Number of tokens, including the end-of-input token
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn eof(&self) -> &Token {
        &self.tokens[self.tokens.len() - 1]
    }
}

impl Index<TokenId> for TokenStream {
    type Output = Token;

    fn index(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }
}

const TYPE_KEYWORDS: &[&str] = &[
    "void", "bool", "int", "uint", "float", "double", "vec2", "vec3", "vec4", "bvec2", "bvec3",
    "bvec4", "ivec2", "ivec3", "ivec4", "uvec2", "uvec3", "uvec4", "dvec2", "dvec3", "dvec4",
    "mat2", "mat3", "mat4", "mat2x2", "mat2x3", "mat2x4", "mat3x2", "mat3x3", "mat3x4", "mat4x2",
    "mat4x3", "mat4x4", "sampler1D", "sampler2D", "sampler3D", "samplerCube", "sampler2DRect",
    "sampler1DShadow", "sampler2DShadow", "samplerCubeShadow", "sampler1DArray",
    "sampler2DArray", "sampler2DArrayShadow", "samplerBuffer", "sampler2DMS", "isampler2D",
    "isampler3D", "isamplerCube", "usampler2D", "usampler3D", "usamplerCube",
];

const QUALIFIER_KEYWORDS: &[&str] = &[
    "const", "uniform", "in", "out", "inout", "attribute", "varying", "centroid", "flat",
    "smooth", "noperspective", "highp", "mediump", "lowp", "invariant", "layout",
];

/// Qualifiers only reserved from GLSL 4.x on. Older shaders use these words as
/// ordinary names, so they lex as identifiers.
const CONTEXTUAL_QUALIFIERS: &[&str] = &[
    "precise", "patch", "sample", "buffer", "shared", "coherent", "volatile", "restrict",
    "readonly", "writeonly", "subroutine",
];

const OTHER_KEYWORDS: &[&str] = &[
    "struct", "precision", "if", "else", "switch", "case", "default", "while", "do", "for",
    "continue", "break", "return", "discard",
];

/// Builtin type names, which the lexer reports as keywords.
pub fn is_type_keyword(word: &str) -> bool {
    TYPE_KEYWORDS.contains(&word)
}

/// Storage, interpolation, precision and layout qualifiers.
pub fn is_qualifier_keyword(word: &str) -> bool {
    QUALIFIER_KEYWORDS.contains(&word)
}

/// Identifiers that read as a qualifier when they stand in front of a type.
pub fn is_contextual_qualifier(word: &str) -> bool {
    CONTEXTUAL_QUALIFIERS.contains(&word)
}

pub(crate) fn is_keyword(word: &str) -> bool {
    is_type_keyword(word) || is_qualifier_keyword(word) || OTHER_KEYWORDS.contains(&word)
}
