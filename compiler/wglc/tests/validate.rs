//! End-to-end validation through the public entry points.

use pretty_assertions::assert_eq;
use wglc::{
    validate, validate_program, validate_program_with_console, ColorMode, Configuration,
    ConsoleMessage, ErrorCode, OutputFormat, ProgramText, Severity, TerminalEmitter,
    ValidationOutcome, ValidationStatus, VariableKind,
};

fn fragment_config() -> Configuration {
    Configuration::default()
}

fn vertex_config() -> Configuration {
    Configuration::default().with_vertex(true)
}

fn run(config: &Configuration, source: &str) -> ValidationOutcome {
    wglc::init_tracing();
    match validate(config, "test.glsl", source) {
        Ok(outcome) => outcome,
        Err(err) => panic!("validation aborted: {err}"),
    }
}

fn codes(outcome: &ValidationOutcome) -> Vec<ErrorCode> {
    outcome.diagnostics.iter().map(|d| d.code).collect()
}

#[test]
fn test_valid_shader_round_trips_as_glsl_es() {
    let outcome = run(
        &fragment_config(),
        "precision mediump float; void main(){gl_FragColor=vec4(1.0);}",
    );
    assert_eq!(outcome.status, ValidationStatus::Succeeded);
    assert!(outcome.diagnostics.as_slice().is_empty());
    assert_eq!(
        outcome.output.as_deref(),
        Some("precision mediump float;\n\nvoid main() {\n    gl_FragColor = vec4(1.0);\n}\n")
    );
}

#[test]
fn test_warnings_do_not_fail_validation() {
    let outcome = run(
        &fragment_config(),
        "precision mediump float;
         float half_of(float x) { if (x > 0.0) { return x * 0.5; } }
         void main() { gl_FragColor = vec4(half_of(1.0)); }",
    );
    assert_eq!(outcome.status, ValidationStatus::SucceededWithWarnings);
    assert!(outcome.succeeded());
    assert_eq!(codes(&outcome), vec![ErrorCode::E2061]);
    assert!(outcome.output.is_some());
}

#[test]
fn test_lex_errors_stop_the_pipeline() {
    // The unknown variable is never reported: parsing and checking are skipped.
    let outcome = run(
        &fragment_config(),
        "precision mediump float; void main() { gl_FragColor = vec4(missing @ 1.0); }",
    );
    assert_eq!(outcome.status, ValidationStatus::Failed);
    assert_eq!(codes(&outcome), vec![ErrorCode::E0001]);
    assert!(outcome.output.is_none());
}

#[test]
fn test_parse_errors_stop_the_pipeline() {
    let outcome = run(
        &fragment_config(),
        "precision mediump float; void main() { float x = ; gl_FragColor = vec4(missing); }",
    );
    assert_eq!(outcome.status, ValidationStatus::Failed);
    assert!(!outcome.diagnostics.as_slice().is_empty());
    assert!(outcome.diagnostics.iter().all(|d| d.code.is_parser_error()));
}

#[test]
fn test_semantic_errors() {
    let outcome = run(
        &fragment_config(),
        "precision mediump float; void main() { gl_FragColor = vec4(missing); }",
    );
    assert_eq!(outcome.status, ValidationStatus::Failed);
    assert!(codes(&outcome).contains(&ErrorCode::E2005));
    assert!(outcome.output.is_none());
    assert!(outcome.variables.is_none());
}

#[test]
fn test_missing_main() {
    let outcome = run(&vertex_config(), "attribute vec4 pos;");
    assert_eq!(codes(&outcome), vec![ErrorCode::E2001]);
}

#[test]
fn test_validate_only() {
    let config = fragment_config().with_generate_output(false);
    let outcome = run(
        &config,
        "precision mediump float; void main() { gl_FragColor = vec4(0.0); }",
    );
    assert!(outcome.succeeded());
    assert_eq!(outcome.output, None);
}

#[test]
fn test_version_header_for_desktop_glsl() {
    let config = fragment_config()
        .with_output_format(OutputFormat::Glsl)
        .with_output_version(120);
    let outcome = run(
        &config,
        "precision mediump float; void main() { gl_FragColor = vec4(0.0); }",
    );
    let output = outcome.output.unwrap_or_default();
    assert!(output.starts_with("#version 120\n"), "{output}");
    assert!(!output.contains("precision"), "{output}");
    assert!(
        output.ends_with("void main() {\n    gl_FragColor = vec4(0.0);\n}\n"),
        "{output}"
    );
}

#[test]
fn test_unsupported_extension_can_be_ignored() {
    let outcome = run(
        &fragment_config(),
        "#extension GL_OES_standard_derivatives : enable
precision mediump float;
void main() { gl_FragColor = vec4(0.0); }",
    );
    assert_eq!(outcome.status, ValidationStatus::SucceededWithWarnings);
    assert_eq!(codes(&outcome), vec![ErrorCode::E0016]);
    let output = outcome.output.unwrap_or_default();
    assert!(!output.contains("#extension"), "{output}");
}

#[test]
fn test_enabled_extensions_are_echoed() {
    let config = fragment_config().with_oes_derivatives(true);
    let outcome = run(
        &config,
        "#extension GL_OES_standard_derivatives : enable
precision mediump float;
varying vec2 uv;
void main() { gl_FragColor = vec4(dFdx(uv), fwidth(uv)); }",
    );
    assert!(outcome.succeeded(), "{}", outcome.log());
    let output = outcome.output.unwrap_or_default();
    assert!(
        output.starts_with("#extension GL_OES_standard_derivatives : enable\n"),
        "{output}"
    );
}

#[test]
fn test_derivatives_need_the_extension() {
    let config = fragment_config().with_oes_derivatives(true);
    let outcome = run(
        &config,
        "precision mediump float;
varying vec2 uv;
void main() { gl_FragColor = vec4(dFdx(uv), 0.0, 0.0); }",
    );
    assert_eq!(outcome.status, ValidationStatus::Failed);
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let outcome = run(
        &fragment_config(),
        "#extension GL_OES_standard_derivatives : require
precision mediump float;
void main() { gl_FragColor = vec4(0.0); }",
    );
    assert_eq!(codes(&outcome), vec![ErrorCode::E0015]);
}

#[test]
fn test_clamp_helper_is_prepended() {
    let config = fragment_config().with_clamp_uniform_array_indexing(true);
    let outcome = run(
        &config,
        "precision mediump float;
uniform vec4 colors[4];
void main() { int j = 1; gl_FragColor = colors[j]; }",
    );
    assert!(outcome.succeeded(), "{}", outcome.log());
    let output = outcome.output.unwrap_or_default();
    assert!(
        output.starts_with(
            "int webgl_op_clamp(int x, int hi) {\n    return x < 0 ? 0 : x > hi ? hi : x;\n}\n"
        ),
        "{output}"
    );
    assert!(output.contains("colors[webgl_op_clamp(j, 3)]"), "{output}");
}

#[test]
fn test_variables_are_returned_on_request() {
    let source = "attribute vec4 pos;
uniform mat4 mvp;
varying vec4 color;
void main() { color = pos; gl_Position = mvp * pos; }";

    let outcome = run(&vertex_config(), source);
    assert!(outcome.variables.is_none());

    let outcome = run(&vertex_config().with_variables(true), source);
    let Some(variables) = outcome.variables else {
        panic!("variables were requested");
    };
    let names = |kind| {
        variables
            .list(kind)
            .iter()
            .map(|v| v.name.as_owned().unwrap_or_default().to_owned())
            .collect::<Vec<_>>()
    };
    assert_eq!(names(VariableKind::Attribute), vec!["pos"]);
    assert_eq!(names(VariableKind::Uniform), vec!["mvp"]);
    assert_eq!(names(VariableKind::Varying), vec!["color"]);
    assert!(variables.varyings()[0].static_write);
}

#[test]
fn test_log_names_fragment_and_line() {
    let outcome = run(
        &fragment_config(),
        "precision mediump float;
void main() {
    gl_FragColor = vec4(missing);
}",
    );
    let log = outcome.log();
    assert!(log.starts_with("error: test.glsl:3: "), "{log}");
    assert!(log.ends_with("error(s), 0 warning(s)\n"), "{log}");
}

#[test]
fn test_terminal_report_shows_the_offending_line() {
    let outcome = run(
        &fragment_config(),
        "precision mediump float;
void main() {
    gl_FragColor = vec4(missing);
}",
    );
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    assert!(outcome.report(&mut emitter).is_ok());
    let text = String::from_utf8(emitter.into_inner()).unwrap_or_default();
    let lines: Vec<&str> = text.lines().collect();
    assert!(
        lines[0].starts_with("test.glsl:3: error: UNKNOWN_VAR (E2005): "),
        "{text}"
    );
    assert_eq!(lines[1], "        gl_FragColor = vec4(missing);");
    assert_eq!(lines[2], format!("{}^^^^^^^ UNKNOWN_VAR", " ".repeat(4 + 24)));
    assert!(text.ends_with("error(s), 0 warning(s)\n"), "{text}");
    assert!(text.contains("validation failed: "), "{text}");
}

#[test]
fn test_program_fragments_keep_their_names() {
    let fragments = [
        ProgramText::new("prelude", "precision mediump float;"),
        ProgramText::new("body", "void main() {\n    gl_FragColor = vec4(missing);\n}"),
    ];
    let outcome = match validate_program(&fragment_config(), "program", &fragments) {
        Ok(outcome) => outcome,
        Err(err) => panic!("validation aborted: {err}"),
    };
    assert_eq!(outcome.status, ValidationStatus::Failed);
    assert!(outcome.log().starts_with("error: body:2: "), "{}", outcome.log());
}

#[test]
fn test_console_posting_follows_configuration() {
    let source = [ProgramText::new(
        "shader.frag",
        "precision mediump float;\nvoid main() { gl_FragColor = vec4(missing); }",
    )];

    let mut console: Vec<ConsoleMessage> = Vec::new();
    let quiet = fragment_config();
    let result = validate_program_with_console(&quiet, "shader.frag", &source, &mut console);
    assert!(result.is_ok());
    assert!(console.is_empty());

    let chatty = fragment_config().with_console_logging(true);
    let result = validate_program_with_console(&chatty, "shader.frag", &source, &mut console);
    assert!(result.is_ok());
    let Some(first) = console.first() else {
        panic!("nothing was posted");
    };
    assert_eq!(first.url, "shader.frag");
    assert_eq!(first.line, 2);
    assert_eq!(first.severity, Severity::Error);
    assert!(first.text.starts_with("UNKNOWN_VAR: "), "{}", first.text);
}

#[test]
fn test_write_output() {
    let outcome = run(
        &fragment_config(),
        "precision mediump float; void main() { gl_FragColor = vec4(0.0); }",
    );
    let mut out = Vec::new();
    assert!(outcome.write_output(&mut out).is_ok());
    assert_eq!(Some(String::from_utf8_lossy(&out).as_ref()), outcome.output.as_deref());

    let failed = run(&fragment_config(), "void main() { undefined(); }");
    let mut out = Vec::new();
    assert!(failed.write_output(&mut out).is_ok());
    assert!(out.is_empty());
}
