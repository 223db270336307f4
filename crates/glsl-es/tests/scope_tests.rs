//! Tests for scoping and declaration order

use es_test::EsTest;

#[test]
fn test_inner_declaration_shadows_outer() {
    let glsl = r#"
        void main() {
            int a = 1;
            {
                float a = 1;
                a = 2;
            }
            a = 3;
        }
    "#;

    let test = EsTest::new(glsl).unwrap();
    test.assert_output(
        r#"
        void main() {
            int a = 1;
            {
                float a = 1.0;
                a = 2.0;
            }
            a = 3;
        }
    "#,
    );
}

#[test]
fn test_for_loop_scope() {
    let glsl = r#"
        void main() {
            float i = 0.5;
            for (int i = 0; i < 3; i++) {
                i = i + 1;
            }
            i = i + 1;
        }
    "#;

    let test = EsTest::new(glsl).unwrap();
    test.assert_output(
        r#"
        void main() {
            float i = 0.5;
            for (int i = 0; i < 3; i++) {
                i = i + 1;
            }
            i = i + 1.0;
        }
    "#,
    );
}

#[test]
fn test_call_before_definition_is_not_resolved() {
    let glsl = r#"
        void main() {
            float r = helper(1);
        }
        float helper(float v) {
            return v;
        }
    "#;

    EsTest::new(glsl).unwrap().assert_unchanged();
}

#[test]
fn test_prototype_enables_forward_call() {
    let glsl = r#"
        float helper(float v);
        void main() {
            float r = helper(1);
        }
        float helper(float v) {
            return v;
        }
    "#;

    let test = EsTest::new(glsl).unwrap();
    test.assert_output(
        r#"
        float helper(float v);
        void main() {
            float r = helper(1.0);
        }
        float helper(float v) {
            return v;
        }
    "#,
    );
}

#[test]
fn test_locals_do_not_leak_between_functions() {
    let glsl = r#"
        void a() {
            float t = 0.5;
        }
        void b() {
            int t = 2;
            t = t * 3;
        }
    "#;

    EsTest::new(glsl).unwrap().assert_unchanged();
}
