//! GLSL core to GLSL ES transpiler.
//!
//! Desktop GLSL promotes integer literals to float wherever a float is
//! expected. GLSL ES does not. This crate finds every integer literal used
//! in a float context and rewrites it as `N.0`, and removes user functions
//! that re-declare a builtin with the same signature. Everything else in
//! the source, comments and formatting included, is reproduced byte for
//! byte.

#![no_std]

extern crate alloc;

mod builtins;
mod diagnostics;
mod error;
mod planner;
mod resolve;
mod rewrite;
mod shader_unit;
mod symbols;
mod transpile;
mod types;
mod typing;

pub use builtins::Catalog;
pub use diagnostics::Diagnostic;
pub use error::{GlslError, GlslResult};
pub use planner::{PlanOutput, RewritePlanner};
pub use rewrite::{emit, ReplacementPlan};
pub use shader_unit::{
    inline_dependency, preprocess_shader_file, strip_version_directive, ShaderStage,
};
pub use symbols::{FunctionSignature, SymbolTable, Variable};
pub use transpile::{transpile, Transpiled, Transpiler};
pub use types::{GlslType, StructType, VectorType};

pub use glsl_cst;
