//! Error types for GLSL ES transpilation.

use alloc::string::String;

/// Result type for transpilation operations.
pub type GlslResult<T> = Result<T, GlslError>;

/// Error that can occur during transpilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlslError {
    /// Source failed to tokenize or parse
    ParseError(String),
    /// Builtin signature list is malformed or empty
    CatalogError(String),
    /// Unknown type, bad vector shape, or unknown struct field
    TypeError(String),
    /// Invalid or out of range swizzle
    SwizzleError(String),
    /// Internal consistency failure
    Internal(String),
}

impl GlslError {
    /// Create a new parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        GlslError::ParseError(msg.into())
    }

    /// Create a new catalog error.
    pub fn catalog(msg: impl Into<String>) -> Self {
        GlslError::CatalogError(msg.into())
    }

    /// Create a new type error.
    pub fn type_error(msg: impl Into<String>) -> Self {
        GlslError::TypeError(msg.into())
    }

    /// Create a new swizzle error.
    pub fn swizzle(msg: impl Into<String>) -> Self {
        GlslError::SwizzleError(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        GlslError::Internal(msg.into())
    }
}

impl From<glsl_cst::SyntaxError> for GlslError {
    fn from(err: glsl_cst::SyntaxError) -> Self {
        GlslError::parse(alloc::format!("{}", err))
    }
}

impl core::fmt::Display for GlslError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GlslError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            GlslError::CatalogError(msg) => write!(f, "Builtin catalog error: {}", msg),
            GlslError::TypeError(msg) => write!(f, "Type error: {}", msg),
            GlslError::SwizzleError(msg) => write!(f, "Swizzle error: {}", msg),
            GlslError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}
