//! Tests for byte-exact preservation of untouched source

use es_test::EsTest;

use glsl_es::transpile;

const ES_SAFE_SHADER: &str = "#version 120\n\
// leading comment\n\
#define SCALE 2.0\n\
#define LONG_MACRO(x) \\\n    ((x) * 2)\n\
/* block\n   comment */\n\
uniform   float  time ;\t// tab\n\
varying vec2 uv;\n\
\n\
void main()\n\
{\n\
    float t = time * 0.5;   // trailing\n\
    gl_FragColor = vec4(uv, t, 1.0);\n\
}\n";

#[test]
fn test_es_safe_source_is_byte_identical() {
    let test = EsTest::new(ES_SAFE_SHADER).unwrap();
    test.assert_unchanged();
    assert!(test.diagnostics().is_empty());
}

#[test]
fn test_only_literals_change() {
    let source = "  float x=1 ;/*a*/float y = 2;\t// b\n";
    let out = transpile(source).unwrap();
    assert_eq!(out.text, "  float x=1.0 ;/*a*/float y = 2.0;\t// b\n");
}

#[test]
fn test_crlf_line_endings() {
    let out = transpile("float x = 1;\r\nint y = 2;\r\n").unwrap();
    assert_eq!(out.text, "float x = 1.0;\r\nint y = 2;\r\n");
}

#[test]
fn test_trailing_text_without_newline() {
    let out = transpile("float x = 1; // end").unwrap();
    assert_eq!(out.text, "float x = 1.0; // end");
}

#[test]
fn test_empty_and_comment_only_sources() {
    assert_eq!(transpile("").unwrap().text, "");
    let source = "// nothing here\n#pragma once\n";
    assert_eq!(transpile(source).unwrap().text, source);
}

#[test]
fn test_idempotence() {
    let source = r#"
        uniform float b;
        float scale(float v, int n) { return v * float(n); }
        void main() {
            vec2 v = vec2(1, 2);
            if (1 > b) {
                gl_FragColor = vec4(scale(2, 3), v, 1);
            }
        }
    "#;

    let once = transpile(source).unwrap().text;
    let twice = transpile(&once).unwrap().text;
    assert_ne!(once, source);
    assert_eq!(once, twice);
}
