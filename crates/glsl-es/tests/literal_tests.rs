//! Tests for integer literal promotion

use es_test::EsTest;

#[test]
fn test_float_declaration() {
    let glsl = r#"
        float x = 1;
        int y = 1;
    "#;

    let test = EsTest::new(glsl).unwrap();
    test.assert_output(
        r#"
        float x = 1.0;
        int y = 1;
    "#,
    );
    assert!(test.diagnostics().is_empty());
}

#[test]
fn test_every_declarator() {
    let test = EsTest::new("float a = 1, b = 2, c;").unwrap();
    test.assert_output("float a = 1.0, b = 2.0, c;");
}

#[test]
fn test_negative_literal() {
    let test = EsTest::new("float n = -1;").unwrap();
    test.assert_output("float n = -1.0;");
}

#[test]
fn test_initializer_list() {
    let test = EsTest::new("float w[3] = { 1, 2, 3 };").unwrap();
    test.assert_output("float w[3] = { 1.0, 2.0, 3.0 };");
}

#[test]
fn test_float_assignments() {
    let glsl = r#"
        void main() {
            float f = 0.5;
            f += 1;
            f = f * 2;
        }
    "#;

    let test = EsTest::new(glsl).unwrap();
    test.assert_output(
        r#"
        void main() {
            float f = 0.5;
            f += 1.0;
            f = f * 2.0;
        }
    "#,
    );
}

#[test]
fn test_vector_assignments() {
    let glsl = r#"
        void main() {
            vec2 v = vec2(0.0);
            v = v * 2;
            v.x = 3;
            v.xy = v.yx * 4;
            gl_FragColor = vec4(1, 0, 0, 1);
        }
    "#;

    let test = EsTest::new(glsl).unwrap();
    test.assert_output(
        r#"
        void main() {
            vec2 v = vec2(0.0);
            v = v * 2.0;
            v.x = 3.0;
            v.xy = v.yx * 4.0;
            gl_FragColor = vec4(1.0, 0.0, 0.0, 1.0);
        }
    "#,
    );
}

#[test]
fn test_integer_code_untouched() {
    let glsl = r#"
        void main() {
            int i = 2;
            int j = i * 3 + 1;
            for (int k = 0; k < 4; k++) {
                j += k;
            }
            ivec2 p = ivec2(1, 2);
        }
    "#;

    let test = EsTest::new(glsl).unwrap();
    test.assert_unchanged();
    assert!(test.diagnostics().is_empty());
}

#[test]
fn test_non_decimal_literals_untouched() {
    let glsl = r#"
        float a = 0x10;
        float b = 010;
        uint c = 3u;
    "#;

    EsTest::new(glsl).unwrap().assert_unchanged();
}

#[test]
fn test_builtin_variables() {
    let glsl = r#"
        void main() {
            gl_FragDepth = 1;
            gl_PointSize = 2;
            gl_FragData[0] = vec4(1);
        }
    "#;

    let test = EsTest::new(glsl).unwrap();
    test.assert_output(
        r#"
        void main() {
            gl_FragDepth = 1.0;
            gl_PointSize = 2.0;
            gl_FragData[0] = vec4(1.0);
        }
    "#,
    );
    assert!(test.diagnostics().is_empty());
}

#[test]
fn test_late_qualifier_words_as_names() {
    let glsl = r#"
        float buffer = 1;
        void main() {
            vec4 sample = vec4(1);
            sample.x = buffer * 2;
        }
    "#;

    let test = EsTest::new(glsl).unwrap();
    test.assert_output(
        r#"
        float buffer = 1.0;
        void main() {
            vec4 sample = vec4(1.0);
            sample.x = buffer * 2.0;
        }
    "#,
    );
    assert!(test.diagnostics().is_empty());
}
