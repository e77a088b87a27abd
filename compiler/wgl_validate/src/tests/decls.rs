use pretty_assertions::assert_eq;
use wgl_diagnostic::ErrorCode;
use wgl_ir::{DeclKind, Precision};

use super::{fragment, vertex};

#[test]
fn test_storage_qualifiers() {
    fragment("attribute vec4 pos; void main() {}").assert_error(ErrorCode::E2043);
    vertex("attribute int id; void main() {}").assert_error(ErrorCode::E2047);
    vertex("attribute mat3 basis; void main() {}").assert_valid();
    vertex("varying int v; void main() {}").assert_error(ErrorCode::E2048);
    vertex("varying vec2 v[2]; void main() {}").assert_valid();
    fragment("void main() { uniform float u; }").assert_error(ErrorCode::E2045);
    fragment("void main() { varying float v; }").assert_error(ErrorCode::E2046);
    fragment("uniform float u = 1.0; void main() {}").assert_error(ErrorCode::E2012);
}

#[test]
fn test_samplers_only_as_uniforms() {
    fragment("uniform sampler2D tex; void main() {}").assert_valid();
    fragment("void main() { sampler2D tex; }").assert_error(ErrorCode::E2012);
}

#[test]
fn test_initializers() {
    fragment("float f = 1; void main() {}").assert_error(ErrorCode::E2010);
    fragment("const float c; void main() {}").assert_error(ErrorCode::E2037);
    fragment("float g = 1.0; const float c = g; void main() {}").assert_error(ErrorCode::E2037);
    fragment("const vec2 c = vec2(1.0, 2.0); const float d = c.y * 2.0; void main() {}")
        .assert_valid();
}

#[test]
fn test_array_sizes() {
    fragment("float a[0]; void main() {}").assert_error(ErrorCode::E2038);
    fragment("float a[2.0]; void main() {}").assert_error(ErrorCode::E2010);
    fragment("int n = 2; float a[n]; void main() {}").assert_error(ErrorCode::E2037);
    fragment("struct S { float a[0]; }; void main() {}").assert_error(ErrorCode::E2040);
}

#[test]
fn test_array_lengths_are_folded() {
    let validated = fragment(
        "const int n = 2 * 3;
         float a[n + 1];
         vec4 b[gl_MaxDrawBuffers];
         void main() {}",
    );
    validated.assert_valid();
    let lengths: Vec<_> = validated
        .unit
        .decls
        .iter()
        .filter_map(|decl| match &decl.kind {
            DeclKind::Array { length, .. } => length.value,
            _ => None,
        })
        .collect();
    assert_eq!(lengths, vec![7, 1]);
}

#[test]
fn test_implicit_precision_is_recorded() {
    let validated = fragment("void main() { float x = 1.0; gl_FragColor = vec4(x); }");
    validated.assert_valid();
    let DeclKind::Var { ty, .. } = validated.first_local_decl() else {
        panic!("expected a variable declaration");
    };
    assert_eq!(ty.precision, Precision::None);
    assert_eq!(ty.implicit_precision, Precision::Medium);
}

#[test]
fn test_precision_scopes() {
    fragment(
        "void main() { { precision highp float; float a = 1.0; } float b = 1.0; }",
    )
    .assert_valid();
    fragment("precision mediump vec2; void main() {}").assert_error(ErrorCode::E2008);
}

#[test]
fn test_structs() {
    fragment("struct S { float a; float a; }; void main() {}").assert_error(ErrorCode::E2004);
    fragment("struct S { float a; } s; void main() { s.a = 1.0; }").assert_valid();
    fragment("struct S { float a; }; struct S { float b; }; void main() {}")
        .assert_error(ErrorCode::E2004);
}

#[test]
fn test_invariant() {
    vertex("invariant gl_Position; void main() { gl_Position = vec4(0.0); }").assert_valid();
    vertex("varying vec2 uv; invariant uv; void main() {}").assert_valid();
    vertex("uniform vec2 u; invariant u; void main() {}").assert_error(ErrorCode::E2049);
    vertex("invariant missing; void main() {}").assert_error(ErrorCode::E2005);
    vertex("invariant varying vec2 uv; void main() {}").assert_valid();
}

#[test]
fn test_function_rules() {
    fragment(
        "float f(float x) { return x; }
         float f(float y) { return y; }
         void main() {}",
    )
    .assert_error(ErrorCode::E2053);
    fragment(
        "float f(float x);
         int f(float x) { return 1; }
         void main() {}",
    )
    .assert_error(ErrorCode::E2053);
    fragment(
        "float f(float x);
         float f(float x) { return x; }
         void main() {}",
    )
    .assert_valid();
    fragment("void f(void v) {} void main() {}").assert_error(ErrorCode::E2055);
    fragment("float f; void f() {} void main() {}").assert_error(ErrorCode::E2004);
}

#[test]
fn test_missing_return_warns() {
    let validated = fragment("float f() { } void main() {}");
    validated.assert_valid();
    assert_eq!(validated.warnings(), vec![ErrorCode::E2061]);

    let validated = fragment(
        "float f(bool b) { if (b) { return 1.0; } else { return 2.0; } }
         void main() {}",
    );
    assert!(validated.output.diagnostics.is_empty());
}

#[test]
fn test_statement_placement() {
    fragment("void main() { break; }").assert_error(ErrorCode::E2031);
    fragment("void main() { continue; }").assert_error(ErrorCode::E2031);
    fragment("void main() { if (1.0) {} }").assert_error(ErrorCode::E2029);
    fragment("void main() { while (1) {} }").assert_error(ErrorCode::E2029);
    fragment("float f() { return; } void main() {}").assert_error(ErrorCode::E2010);
    fragment("void f() { return 1.0; } void main() {}").assert_error(ErrorCode::E2010);
}

#[test]
fn test_switch() {
    fragment(
        "void main() {
             int i = 1;
             switch (i) { case 1: break; default: break; }
         }",
    )
    .assert_valid();
    fragment("void main() { float f = 1.0; switch (f) { default: break; } }")
        .assert_error(ErrorCode::E2029);
    fragment("void main() { int i = 1; switch (i) { i = 2; case 1: break; } }")
        .assert_error(ErrorCode::E2031);
    fragment("void main() { int i = 1; int j = 1; switch (i) { case j: break; } }")
        .assert_error(ErrorCode::E2037);
}
