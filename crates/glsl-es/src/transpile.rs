//! Transpiler entry points.

use alloc::{string::String, vec::Vec};

use glsl_cst::parse;
use log::trace;

use crate::{
    builtins::Catalog,
    diagnostics::Diagnostic,
    error::GlslResult,
    planner::RewritePlanner,
    rewrite::emit,
};

/// Rewritten source together with everything that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transpiled {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Rewrites desktop GLSL into GLSL ES against a builtin catalog.
#[derive(Debug, Clone, Copy)]
pub struct Transpiler<'c> {
    catalog: &'c Catalog,
}

impl Transpiler<'static> {
    /// Transpiler over the bundled builtin catalog.
    pub fn new() -> GlslResult<Self> {
        Ok(Transpiler::with_catalog(Catalog::builtin()?))
    }
}

impl<'c> Transpiler<'c> {
    pub fn with_catalog(catalog: &'c Catalog) -> Self {
        Transpiler { catalog }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Transpile one translation unit.
    ///
    /// Only a syntax error fails the call. Anything the planner cannot
    /// resolve is left unchanged and reported in the diagnostics.
    pub fn transpile(&self, source: &str) -> GlslResult<Transpiled> {
        let tree = parse(source)?;
        trace!("parsed {} tokens into {} nodes", tree.tokens().len(), tree.len());
        let output = RewritePlanner::new(&tree, self.catalog).plan();
        let text = emit(source, tree.tokens(), &output.plan)?;
        Ok(Transpiled {
            text,
            diagnostics: output.diagnostics,
        })
    }
}

/// Transpile `source` with the bundled builtin catalog.
pub fn transpile(source: &str) -> GlslResult<Transpiled> {
    Transpiler::new()?.transpile(source)
}
