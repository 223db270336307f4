//! Token replacement plan and the emitter that applies it.

use alloc::{collections::BTreeMap, format, string::String};

use glsl_cst::{EntityRef, TokenId, TokenKind, TokenStream};
use log::error;

use crate::error::{GlslError, GlslResult};

/// Replacement text per token. An empty replacement deletes the token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementPlan {
    replacements: BTreeMap<TokenId, String>,
}

impl ReplacementPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan `text` in place of `token`.
    ///
    /// Each token is written at most once. A later, different replacement
    /// for the same token is a planner bug; the first one is kept.
    pub fn replace(&mut self, token: TokenId, text: impl Into<String>) {
        let text = text.into();
        match self.replacements.get(&token) {
            Some(existing) if *existing != text => {
                error!(
                    "conflicting replacements for {}: {:?} and {:?}",
                    token, existing, text
                );
                debug_assert!(false, "conflicting replacements for {}", token);
            }
            Some(_) => {}
            None => {
                self.replacements.insert(token, text);
            }
        }
    }

    pub fn delete(&mut self, token: TokenId) {
        self.replace(token, "");
    }

    /// Delete `first` through `last`, inclusive.
    pub fn delete_range(&mut self, first: TokenId, last: TokenId) {
        for index in first.index()..=last.index() {
            self.delete(TokenId::from_index(index));
        }
    }

    pub fn get(&self, token: TokenId) -> Option<&str> {
        self.replacements.get(&token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &str)> {
        self.replacements
            .iter()
            .map(|(token, text)| (*token, text.as_str()))
    }
}

/// Reassemble `source` from its tokens, applying `plan`.
///
/// Text between tokens (whitespace, comments, directives) and every
/// unplanned token are copied unchanged.
pub fn emit(source: &str, tokens: &TokenStream, plan: &ReplacementPlan) -> GlslResult<String> {
    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    for token in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
        let gap = source.get(last..token.start);
        let original = source.get(token.start..token.end);
        let (Some(gap), Some(original)) = (gap, original) else {
            return Err(GlslError::internal(format!(
                "token {} at {}..{} does not fit the source text",
                token.index, token.start, token.end
            )));
        };
        out.push_str(gap);
        out.push_str(plan.get(token.index).unwrap_or(original));
        last = token.end;
    }
    out.push_str(source.get(last..).unwrap_or_default());
    Ok(out)
}
