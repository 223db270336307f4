//! Tests for the shader file helpers

use glsl_es::{inline_dependency, preprocess_shader_file, GlslError, ShaderStage};

#[test]
fn test_fragment_shader_is_transpiled() {
    let source = "#version 120\nvoid main() { gl_FragColor = vec4(1); }\n";
    let out = preprocess_shader_file("shaders/final.frag", source).unwrap();
    assert_eq!(out, "#version 120\nvoid main() { gl_FragColor = vec4(1.0); }\n");
}

#[test]
fn test_vertex_shader_is_transpiled() {
    let source = "void main() { gl_PointSize = 2; }";
    let out = preprocess_shader_file("composite.vert", source).unwrap();
    assert_eq!(out, "void main() { gl_PointSize = 2.0; }");
}

#[test]
fn test_other_units_pass_through() {
    let source = "float half_of(float x) { return x / 2; }\n";
    assert_eq!(ShaderStage::from_path("lib/common.glsl"), None);
    let out = preprocess_shader_file("lib/common.glsl", source).unwrap();
    assert_eq!(out, source);
}

#[test]
fn test_syntax_error_is_reported() {
    let err = preprocess_shader_file("broken.frag", "void main() { float = 1; }").unwrap_err();
    assert!(matches!(err, GlslError::ParseError(_)));
}

#[test]
fn test_inline_dependency() {
    let mut target = String::from("void main() {}");
    inline_dependency(
        &mut target,
        "#version 120\nfloat helper(float x) { return x; }\n",
    );
    assert_eq!(target, "void main() {}\nfloat helper(float x) { return x; }\n");

    let mut empty = String::new();
    inline_dependency(&mut empty, "  #version 330\r\nint k;");
    assert_eq!(empty, "int k;");
}
