//! Tokenizer for GLSL source text.
//!
//! Whitespace, comments and preprocessor directives never become tokens.
//! They stay in the source between token offsets.

mod literal;

use alloc::{
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};

use log::trace;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{alpha1, alphanumeric1, char, multispace1, none_of, not_line_ending, one_of},
    combinator::{map, recognize},
    multi::many0,
    sequence::{pair, tuple},
    IResult,
};

use self::literal::{float_literal, int_literal};
use crate::{
    entity::{EntityRef, TokenId},
    error::{SyntaxError, SyntaxResult},
    token::{is_keyword, Token, TokenKind, TokenStream},
};

/// Tokenize GLSL source.
///
/// The returned stream always ends with an [`TokenKind::Eof`] token positioned
/// at the end of the input.
pub fn tokenize(source: &str) -> SyntaxResult<TokenStream> {
    let lines = LineOffsets::new(source);
    let mut tokens = Vec::new();
    let mut remaining = source;

    loop {
        while let Ok((rest, _)) = hidden_text(remaining) {
            remaining = rest;
        }
        if remaining.is_empty() {
            break;
        }

        let start = source.len() - remaining.len();
        let (line, column) = lines.line_col(start);
        match next_token(remaining) {
            Ok((rest, (kind, text))) => {
                tokens.push(Token {
                    index: TokenId::from_index(tokens.len()),
                    kind,
                    start,
                    end: source.len() - rest.len(),
                    line,
                    column,
                    text: text.to_string(),
                });
                remaining = rest;
            }
            Err(_) => {
                let found = remaining.chars().next().unwrap_or_default();
                return Err(SyntaxError::new(
                    line,
                    column,
                    format!("unexpected character '{}'", found),
                ));
            }
        }
    }

    let (line, column) = lines.line_col(source.len());
    tokens.push(Token {
        index: TokenId::from_index(tokens.len()),
        kind: TokenKind::Eof,
        start: source.len(),
        end: source.len(),
        line,
        column,
        text: String::new(),
    });
    trace!("tokenized {} bytes into {} tokens", source.len(), tokens.len());
    Ok(TokenStream::new(tokens))
}

/// Text that separates tokens but is not one.
fn hidden_text(input: &str) -> IResult<&str, &str> {
    alt((multispace1, line_comment, block_comment, directive))(input)
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("//"), not_line_ending))(input)
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize(tuple((tag("/*"), take_until("*/"), tag("*/"))))(input)
}

/// A preprocessor line, following backslash continuations.
fn directive(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        char('#'),
        many0(alt((tag("\\\r\n"), tag("\\\n"), recognize(none_of("\r\n"))))),
    ))(input)
}

fn next_token(input: &str) -> IResult<&str, (TokenKind, &str)> {
    alt((
        map(float_literal, |text| (TokenKind::FloatLiteral, text)),
        int_literal,
        map(identifier, |text| (classify_word(text), text)),
        map(punctuation, |text| (TokenKind::Punct, text)),
    ))(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn classify_word(word: &str) -> TokenKind {
    match word {
        "true" | "false" => TokenKind::BoolLiteral,
        _ if is_keyword(word) => TokenKind::Keyword,
        _ => TokenKind::Identifier,
    }
}

/// Operators, longest match first.
fn punctuation(input: &str) -> IResult<&str, &str> {
    alt((
        alt((
            tag("<<="),
            tag(">>="),
            tag("++"),
            tag("--"),
            tag("<="),
            tag(">="),
            tag("=="),
            tag("!="),
            tag("&&"),
            tag("||"),
            tag("^^"),
        )),
        alt((
            tag("+="),
            tag("-="),
            tag("*="),
            tag("/="),
            tag("%="),
            tag("&="),
            tag("|="),
            tag("^="),
            tag("<<"),
            tag(">>"),
        )),
        recognize(one_of("+-*/%<>=!~&|^?:;,.()[]{}")),
    ))(input)
}

/// Line start table for offset to line/column conversion.
#[derive(Debug, Clone)]
pub struct LineOffsets {
    /// Byte offsets where each line starts. line_starts[0] = 0.
    line_starts: Vec<usize>,
}

impl LineOffsets {
    pub fn new(input: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, ch) in input.char_indices() {
            if ch == '\n' {
                line_starts.push(i + 1);
            }
        }
        LineOffsets { line_starts }
    }

    /// Convert a byte offset to (line, column), both 1-based.
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let column = offset - self.line_starts[line_idx] + 1;
        ((line_idx + 1) as u32, column as u32)
    }
}
