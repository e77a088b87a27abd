//! Two-stage programs: linkage, preprocessing and HLSL translation.

use pretty_assertions::assert_eq;
use wgl_ir::djb_hash;
use wglc::{
    validate, validate_linkage, Configuration, ErrorCode, OutputFormat, Semantic, SemanticInfo,
    ShaderVariables, ValidationOutcome, ValidationStatus,
};

fn run(config: &Configuration, source: &str) -> ValidationOutcome {
    wglc::init_tracing();
    match validate(config, "test.glsl", source) {
        Ok(outcome) => outcome,
        Err(err) => panic!("validation aborted: {err}"),
    }
}

fn interface(for_vertex: bool, source: &str) -> ShaderVariables {
    let config = Configuration::default()
        .with_vertex(for_vertex)
        .with_variables(true)
        .with_generate_output(false);
    let outcome = run(&config, source);
    assert!(outcome.succeeded(), "{}", outcome.log());
    outcome.variables.unwrap_or_default()
}

fn link_codes(vertex: &str, fragment: &str) -> Vec<ErrorCode> {
    let vertex = interface(true, vertex);
    let fragment = interface(false, fragment);
    validate_linkage(&Configuration::default(), &vertex, &fragment)
        .diagnostics
        .iter()
        .map(|d| d.code)
        .collect()
}

const VERTEX: &str = "attribute vec4 pos;
uniform mat4 mvp;
varying vec2 uv;
void main() { uv = pos.xy; gl_Position = mvp * pos; }";

#[test]
fn test_matching_program_links() {
    let codes = link_codes(
        VERTEX,
        "precision mediump float;
varying vec2 uv;
void main() { gl_FragColor = vec4(uv, 0.0, 1.0); }",
    );
    assert_eq!(codes, vec![]);
}

#[test]
fn test_uniform_type_mismatch() {
    let vertex = interface(
        true,
        "uniform vec3 tint; void main() { gl_Position = vec4(tint, 1.0); }",
    );
    let fragment = interface(
        false,
        "precision mediump float; uniform vec4 tint; void main() { gl_FragColor = tint; }",
    );
    let outcome = validate_linkage(&Configuration::default(), &vertex, &fragment);
    assert!(!outcome.linked());
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].code, ErrorCode::E3001);
    assert_eq!(
        outcome.diagnostics[0].message,
        "uniform `tint` is declared as `vec3` in one shader and as `vec4` in the other"
    );
}

#[test]
fn test_varying_type_mismatch() {
    let codes = link_codes(
        VERTEX,
        "precision mediump float;
varying vec3 uv;
void main() { gl_FragColor = vec4(uv, 1.0); }",
    );
    assert_eq!(codes, vec![ErrorCode::E3002]);
}

#[test]
fn test_unwritten_varying_still_links() {
    let vertex = interface(
        true,
        "varying vec2 uv; void main() { gl_Position = vec4(0.0); }",
    );
    let fragment = interface(
        false,
        "precision mediump float; varying vec2 uv; void main() { gl_FragColor = vec4(uv, 0.0, 1.0); }",
    );
    let outcome = validate_linkage(&Configuration::default(), &vertex, &fragment);
    assert!(outcome.linked());
    assert_eq!(outcome.warnings().map(|d| d.code).collect::<Vec<_>>(), vec![ErrorCode::E3005]);
}

#[test]
fn test_preprocessor_selects_code() {
    let outcome = run(
        &Configuration::default(),
        "#ifdef GL_FRAGMENT_PRECISION_HIGH
precision highp float;
#else
precision mediump float;
#endif
#define SCALE(x) ((x) * 2.0)
#if __VERSION__ == 100 && defined(GL_ES)
void main() { gl_FragColor = vec4(SCALE(0.5)); }
#endif",
    );
    assert_eq!(outcome.status, ValidationStatus::Succeeded, "{}", outcome.log());
    let output = outcome.output.unwrap_or_default();
    assert!(output.starts_with("precision highp float;\n"), "{output}");
    assert!(output.contains("vec4(0.5 * 2.0)"), "{output}");
}

#[test]
fn test_error_directive() {
    let outcome = run(
        &Configuration::default(),
        "#ifndef GL_ES
#error not an ES context
#endif
#if GL_ES
#error no luck
#endif
void main() {}",
    );
    assert_eq!(outcome.status, ValidationStatus::Failed);
    let codes: Vec<_> = outcome.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E0011]);
    assert!(outcome.log().contains("#error no luck"), "{}", outcome.log());
}

#[test]
fn test_hlsl_vertex_translation() {
    let mut semantics = SemanticInfo::default();
    semantics.insert("pos".to_owned(), Semantic::Position);
    let config = Configuration::default()
        .with_vertex(true)
        .with_output_format(OutputFormat::Hlsl9)
        .with_vertex_semantic_info(semantics)
        .with_shader_names("transform", "shade");
    let outcome = run(&config, VERTEX);
    assert!(outcome.succeeded(), "{}", outcome.log());
    let output = outcome.output.unwrap_or_default();
    for expected in [
        "float4 pos : POSITION0;",
        "float2 uv : TEXCOORD0;",
        "VS_OUT transform(VS_IN IN) {",
        "void webgl_main() {",
        "mul(",
    ] {
        assert!(output.contains(expected), "missing `{expected}` in:\n{output}");
    }
}

#[test]
fn test_hlsl_pixel_translation() {
    let config = Configuration::default().with_output_format(OutputFormat::Hlsl10);
    let outcome = run(
        &config,
        "precision mediump float;
uniform sampler2D tex;
varying vec2 uv;
void main() { gl_FragColor = texture2D(tex, uv); }",
    );
    assert!(outcome.succeeded(), "{}", outcome.log());
    let output = outcome.output.unwrap_or_default();
    assert!(output.contains("PS_OUT ps_main("), "{output}");
    assert!(output.contains("SV_Target0"), "{output}");
}

#[test]
fn test_hlsl_reserved_names_are_aliased() {
    let config = Configuration::default()
        .with_vertex(true)
        .with_output_format(OutputFormat::Hlsl9)
        .with_variables(true);
    let outcome = run(
        &config,
        "uniform float line;
void main() { float point = line; gl_Position = vec4(point); }",
    );
    assert!(outcome.succeeded(), "{}", outcome.log());

    let alias = format!("webgl_h{}", djb_hash("line"));
    let output = outcome.output.unwrap_or_default();
    assert!(output.contains(&alias), "{output}");
    assert!(!output.contains("float line"), "{output}");
    assert!(!output.contains("float point"), "{output}");

    let variables = outcome.variables.unwrap_or_default();
    let uniform = &variables.uniforms()[0];
    assert_eq!(uniform.name.as_owned(), Some("line"));
    assert_eq!(
        uniform.alias_name.as_ref().and_then(|a| a.as_owned()),
        Some(alias.as_str())
    );
}

#[test]
fn test_glsl_output_keeps_reserved_hlsl_names() {
    let outcome = run(
        &Configuration::default().with_vertex(true),
        "uniform float line;
void main() { gl_Position = vec4(line); }",
    );
    let output = outcome.output.unwrap_or_default();
    assert!(output.contains("uniform float line;"), "{output}");
}
