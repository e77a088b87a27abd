//! The validation pipeline.
//!
//! Lexing, parsing and the semantic pass each run only when every earlier
//! stage came back without errors, so a broken shader reports the problems
//! of one stage only. Warnings never stop the pipeline.

use wgl_diagnostic::emitter::ConsoleSink;
use wgl_diagnostic::{DiagnosticQueue, SourceMap};
use wgl_fmt::{print_unit_to, Emitter, PrintOptions, StringEmitter};
use wgl_hlsl::ValidatedShader;
use wgl_ir::{StringInterner, TranslationUnit};
use wgl_lexer::{lex, Extension, ExtensionSet, LexError};
use wgl_parse::{parse, ParseError, ParseOptions};
use wgl_validate::{ShaderVariables, ValidateOutput, CLAMP_HELPER};

use crate::{Configuration, FatalError, LinkageOutcome, ValidationOutcome};

/// One named piece of a program's source.
#[derive(Copy, Clone, Debug)]
pub struct ProgramText<'a> {
    pub name: &'a str,
    pub text: &'a str,
}

impl<'a> ProgramText<'a> {
    pub fn new(name: &'a str, text: &'a str) -> Self {
        ProgramText { name, text }
    }
}

/// Validate, and optionally translate, one shader.
pub fn validate(
    config: &Configuration,
    url: &str,
    source: &str,
) -> Result<ValidationOutcome, FatalError> {
    validate_program(config, url, &[ProgramText::new(url, source)])
}

/// Validate a shader given as several fragments, which lex as one
/// continuous text. Diagnostics name the fragment they point into.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(url = %url, format = %config.output_format, stage = ?config.stage())
)]
pub fn validate_program(
    config: &Configuration,
    url: &str,
    fragments: &[ProgramText<'_>],
) -> Result<ValidationOutcome, FatalError> {
    let mut sources = SourceMap::new();
    for fragment in fragments {
        sources.add_fragment(fragment.name, fragment.text)?;
    }

    // Everything interned or allocated below dies with this call.
    let mut interner = StringInterner::new();
    let mut diagnostics = DiagnosticQueue::new();

    let lexed = lex(&sources, &config.lex_options(), &mut interner);
    diagnostics.extend(lexed.errors.iter().map(LexError::to_diagnostic));
    if lexed.have_errors() {
        tracing::debug!(errors = diagnostics.error_count(), "lexing failed");
        return Ok(ValidationOutcome::new(diagnostics, sources, None, None));
    }

    let parse_options = ParseOptions {
        rewrite_texcoords: config.rewrite_texcoords,
    };
    let parsed = parse(&lexed.tokens, &mut interner, &parse_options);
    diagnostics.extend(parsed.errors.iter().map(ParseError::to_diagnostic));
    if parsed.have_errors() {
        tracing::debug!(errors = diagnostics.error_count(), "parsing failed");
        return Ok(ValidationOutcome::new(diagnostics, sources, None, None));
    }

    let mut unit = parsed.unit;
    let derivatives = lexed.extensions.is_enabled(Extension::OesStandardDerivatives);
    let ValidateOutput {
        types,
        variables,
        diagnostics: semantic,
        used_clamp,
        ..
    } = wgl_validate::validate(&mut unit, &mut interner, &config.validate_options(derivatives));
    diagnostics.extend(semantic.into_vec());

    if let Some(internal) = diagnostics.iter().find(|d| d.code.is_internal_error()) {
        return Err(FatalError::Internal(internal.message.clone()));
    }
    if diagnostics.has_errors() {
        tracing::debug!(errors = diagnostics.error_count(), "validation failed");
        return Ok(ValidationOutcome::new(diagnostics, sources, None, None));
    }

    let owned = config
        .want_variables
        .then(|| variables.owned_copy(&interner));
    let output = config.generate_output.then(|| {
        if config.output_format.is_hlsl() {
            let shader = ValidatedShader {
                unit: &unit,
                interner: &interner,
                types: &types,
                variables: &variables,
                used_clamp,
            };
            wgl_hlsl::generate(&shader, &config.hlsl_options())
        } else {
            glsl_output(config, &unit, &interner, &lexed.extensions, used_clamp)
        }
    });

    tracing::debug!(
        warnings = diagnostics.warning_count(),
        output_len = output.as_ref().map_or(0, String::len),
        "validation succeeded"
    );
    Ok(ValidationOutcome::new(diagnostics, sources, owned, output))
}

/// [`validate_program`], posting the diagnostics to `console` when the
/// configuration asks for console logging.
pub fn validate_program_with_console(
    config: &Configuration,
    url: &str,
    fragments: &[ProgramText<'_>],
    console: &mut dyn ConsoleSink,
) -> Result<ValidationOutcome, FatalError> {
    let outcome = validate_program(config, url, fragments)?;
    if config.console_logging {
        outcome.post_to_console(console, url);
    }
    Ok(outcome)
}

/// Check that a vertex and a fragment shader agree on their uniforms,
/// varyings and attributes. Both tables must be owned copies, as returned
/// with [`Configuration::want_variables`].
#[tracing::instrument(level = "debug", skip_all, fields(format = %config.output_format))]
pub fn validate_linkage(
    config: &Configuration,
    vertex: &ShaderVariables,
    fragment: &ShaderVariables,
) -> LinkageOutcome {
    let diagnostics = wgl_validate::validate_linkage(vertex, fragment);
    LinkageOutcome { diagnostics }
}

/// GLSL clamp helper. GLSL ES 1.00 has no integer `clamp`.
const GLSL_CLAMP_HELPER_BODY: &str = "(int x, int hi) {\n    return x < 0 ? 0 : x > hi ? hi : x;\n}\n";

/// `#version` and `#extension` lines, the clamp helper when an index was
/// clamped, then the printed shader.
fn glsl_output(
    config: &Configuration,
    unit: &TranslationUnit,
    interner: &StringInterner,
    extensions: &ExtensionSet,
    used_clamp: bool,
) -> String {
    let mut out = StringEmitter::new();
    if config.output_version > 100 {
        out.emit_fmt(format_args!("#version {}", config.output_version));
        out.emit_newline();
    }
    for (extension, behavior) in extensions.enabled() {
        out.emit_fmt(format_args!("#extension {extension} : {}", behavior.as_str()));
        out.emit_newline();
    }
    if used_clamp {
        out.emit_fmt(format_args!("int {CLAMP_HELPER}{GLSL_CLAMP_HELPER_BODY}"));
        out.emit_newline();
    }
    let options = PrintOptions {
        output_format: config.output_format,
        stage: config.stage(),
        support_highp_fragment: config.support_highp_fragment,
    };
    print_unit_to(&mut out, unit, interner, options);
    out.trim_trailing_blank_lines();
    out.ensure_trailing_newline();
    out.output()
}
