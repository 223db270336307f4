//! Non-fatal findings collected while planning a rewrite.

use alloc::{string::String, vec::Vec};
use core::fmt;

use glsl_cst::Token;
use log::debug;

/// Something the transpiler could not resolve. The affected node is left
/// as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Deduplicating diagnostic sink.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn report(&mut self, token: &Token, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            line: token.line,
            column: token.column,
            message: message.into(),
        };
        if self.items.contains(&diagnostic) {
            return;
        }
        debug!("{}", diagnostic);
        self.items.push(diagnostic);
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
