use pretty_assertions::assert_eq;
use wgl_ir::{djb_hash, BasicType, DeclKind, OutputFormat, Precision, ShaderStage, VectorType};

use super::{fragment, validate_with, vertex, Validated};
use crate::{ShaderVariable, ValidateOptions, VarType, VariableKind};

fn names(validated: &Validated, list: &[ShaderVariable]) -> Vec<String> {
    list.iter()
        .map(|v| v.name.resolve(&validated.interner).to_owned())
        .collect()
}

#[test]
fn test_only_used_attributes_and_uniforms_are_listed() {
    let validated = vertex(
        "attribute vec4 pos;
         attribute vec2 unused_attr;
         uniform mat4 mvp;
         uniform float unused;
         void main() { gl_Position = mvp * pos; }",
    );
    validated.assert_valid();
    let variables = &validated.output.variables;
    assert_eq!(names(&validated, variables.attributes()), vec!["pos"]);
    assert_eq!(names(&validated, variables.uniforms()), vec!["mvp"]);
    assert_eq!(variables.attributes()[0].kind, VariableKind::Attribute);
    assert_eq!(
        variables.attributes()[0].ty,
        VarType::Vector(VectorType::of(BasicType::Float, 4))
    );
}

#[test]
fn test_lists_are_name_sorted() {
    let validated = vertex(
        "uniform float zeta;
         uniform float alpha;
         uniform float mid;
         void main() { gl_Position = vec4(zeta + alpha + mid); }",
    );
    assert_eq!(
        names(&validated, validated.output.variables.uniforms()),
        vec!["alpha", "mid", "zeta"]
    );
}

#[test]
fn test_varyings_and_static_write() {
    let validated = vertex(
        "varying vec2 written;
         varying vec2 idle;
         void main() { written = vec2(1.0); gl_Position = vec4(0.0); }",
    );
    let varyings = validated.output.variables.varyings();
    assert_eq!(names(&validated, varyings), vec!["idle", "written"]);
    assert!(!varyings[0].static_write);
    assert!(varyings[1].static_write);

    // GLSL fragment shaders list only the varyings they read.
    let validated = fragment(
        "varying vec2 read;
         varying vec2 ignored;
         void main() { gl_FragColor = vec4(read, 0.0, 1.0); }",
    );
    assert_eq!(
        names(&validated, validated.output.variables.varyings()),
        vec!["read"]
    );
}

#[test]
fn test_declared_precision_is_recorded() {
    let validated = fragment(
        "uniform highp vec3 light;
         uniform vec3 tint;
         void main() { gl_FragColor = vec4(light + tint, 1.0); }",
    );
    let uniforms = validated.output.variables.uniforms();
    assert_eq!(uniforms[0].precision, Precision::High);
    assert_eq!(uniforms[1].precision, Precision::Medium);
}

#[test]
fn test_hlsl_aliases() {
    let options = ValidateOptions {
        stage: ShaderStage::Vertex,
        output_format: OutputFormat::Hlsl9,
        ..ValidateOptions::default()
    };
    let validated = validate_with(
        "uniform float line;
         void main() { float point = line; gl_Position = vec4(point); }",
        &options,
    );
    validated.assert_valid();

    let uniform = &validated.output.variables.uniforms()[0];
    assert_eq!(uniform.name.resolve(&validated.interner), "line");
    let alias = uniform.alias_name.as_ref().map(|a| a.resolve(&validated.interner));
    let expected = format!("webgl_h{}", djb_hash("line"));
    assert_eq!(alias, Some(expected.as_str()));

    let DeclKind::Var { name, .. } = validated.first_local_decl() else {
        panic!("expected a variable declaration");
    };
    assert_eq!(validated.interner.lookup(*name), "webgl_0");
}

#[test]
fn test_glsl_targets_keep_names() {
    let validated = vertex("uniform float line; void main() { gl_Position = vec4(line); }");
    assert_eq!(validated.output.variables.uniforms()[0].alias_name, None);
}

#[test]
fn test_owned_copy() {
    let validated = vertex("uniform float scale; void main() { gl_Position = vec4(scale); }");
    let owned = validated
        .output
        .variables
        .owned_copy(&validated.interner);
    assert_eq!(owned.uniforms()[0].name.as_owned(), Some("scale"));
}
