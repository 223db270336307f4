//! Shader file helpers for hosts that load shaders by path.
//!
//! Only vertex and fragment shaders are transpiled. Other units, such as
//! `.glsl` files pulled in by an include mechanism, are passed through and
//! can be inlined into the unit that depends on them.

use alloc::string::{String, ToString};
use core::fmt;

use log::{debug, info};

use crate::{error::GlslResult, transpile::Transpiler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Stage for a shader path, by extension: `.vert` or `.frag`.
    pub fn from_path(path: &str) -> Option<ShaderStage> {
        let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
        match file.rsplit_once('.')?.1 {
            "vert" => Some(ShaderStage::Vertex),
            "frag" => Some(ShaderStage::Fragment),
            _ => None,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Transpile a vertex or fragment shader. Any other unit is returned as is.
pub fn preprocess_shader_file(path: &str, source: &str) -> GlslResult<String> {
    let Some(stage) = ShaderStage::from_path(path) else {
        info!("passing {} through unchanged", path);
        return Ok(source.to_string());
    };
    info!("transpiling {} shader {}", stage, path);
    let out = Transpiler::new()?.transpile(source)?;
    for diagnostic in &out.diagnostics {
        debug!("{}:{}", path, diagnostic);
    }
    Ok(out.text)
}

/// Remove the first `#version` line, including its line terminator.
pub fn strip_version_directive(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut stripped = false;
    for line in source.split_inclusive('\n') {
        if !stripped && is_version_line(line) {
            stripped = true;
            continue;
        }
        out.push_str(line);
    }
    out
}

fn is_version_line(line: &str) -> bool {
    line.trim_start()
        .strip_prefix("#version")
        .is_some_and(|rest| rest.starts_with([' ', '\t']))
}

/// Append a dependency's body to `target`, without its `#version` line.
///
/// The body starts on a new line.
pub fn inline_dependency(target: &mut String, dependency: &str) {
    if !target.is_empty() && !target.ends_with('\n') {
        target.push('\n');
    }
    target.push_str(&strip_version_directive(dependency));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_from_path() {
        assert_eq!(ShaderStage::from_path("shaders/a.vert"), Some(ShaderStage::Vertex));
        assert_eq!(ShaderStage::from_path("b.frag"), Some(ShaderStage::Fragment));
        assert_eq!(ShaderStage::from_path("common.glsl"), None);
        assert_eq!(ShaderStage::from_path("shaders.vert/readme"), None);
        assert_eq!(ShaderStage::from_path("frag"), None);
    }

    #[test]
    fn test_strip_version_directive() {
        assert_eq!(
            strip_version_directive("#version 120\nfloat x;\n"),
            "float x;\n"
        );
        assert_eq!(
            strip_version_directive("// header\n  #version\t330 core\r\nvoid main() {}"),
            "// header\nvoid main() {}"
        );
        assert_eq!(strip_version_directive("#versionx\n"), "#versionx\n");
        assert_eq!(
            strip_version_directive("#version 120\n#version 130\n"),
            "#version 130\n"
        );
    }
}
