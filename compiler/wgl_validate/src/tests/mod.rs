//! Validator tests, driven from source through the lexer and parser.

mod decls;
mod shader_variables;

use pretty_assertions::assert_eq;
use wgl_diagnostic::{ErrorCode, SourceMap};
use wgl_ir::{DeclKind, StmtKind};
use wgl_lexer::{lex, LexOptions};
use wgl_parse::{parse, ParseOptions};

use super::*;

pub(super) struct Validated {
    pub unit: TranslationUnit,
    pub interner: StringInterner,
    pub output: ValidateOutput,
}

impl Validated {
    pub fn errors(&self) -> Vec<ErrorCode> {
        self.output
            .diagnostics
            .iter()
            .filter(|d| d.is_error())
            .map(|d| d.code)
            .collect()
    }

    pub fn warnings(&self) -> Vec<ErrorCode> {
        self.output
            .diagnostics
            .iter()
            .filter(|d| d.is_warning())
            .map(|d| d.code)
            .collect()
    }

    #[track_caller]
    pub fn assert_valid(&self) {
        assert!(
            !self.output.have_errors(),
            "unexpected errors: {:?}",
            self.output.diagnostics
        );
    }

    #[track_caller]
    pub fn assert_error(&self, code: ErrorCode) {
        assert!(
            self.errors().contains(&code),
            "expected {code:?}, found {:?}",
            self.output.diagnostics
        );
    }

    /// Declarations of the first statement in the body of the last
    /// function.
    pub fn first_local_decl(&self) -> &DeclKind {
        let Some(DeclKind::Function { body, .. }) = self.unit.decls.last().map(|d| &d.kind) else {
            panic!("expected a function definition last");
        };
        let StmtKind::Body(stmts) = &self.unit.stmt(*body).kind else {
            panic!("expected a compound body");
        };
        let Some(StmtKind::Decl(decls)) = stmts.first().map(|&s| &self.unit.stmt(s).kind) else {
            panic!("expected a declaration statement first");
        };
        &decls[0].kind
    }
}

pub(super) fn validate_with(source: &str, options: &ValidateOptions) -> Validated {
    let sources = SourceMap::single("shader", source).unwrap_or_default();
    let mut interner = StringInterner::new();
    let lex_options = LexOptions {
        stage: options.stage,
        support_highp_fragment: true,
        support_oes_derivatives: true,
    };
    let lexed = lex(&sources, &lex_options, &mut interner);
    assert!(!lexed.have_errors(), "lex errors: {:?}", lexed.errors);
    let parsed = parse(&lexed.tokens, &mut interner, &ParseOptions::default());
    assert!(!parsed.have_errors(), "parse errors: {:?}", parsed.errors);
    let mut unit = parsed.unit;
    let output = validate(&mut unit, &mut interner, options);
    Validated {
        unit,
        interner,
        output,
    }
}

/// Fragment shader with `precision mediump float;` prepended.
pub(super) fn fragment(source: &str) -> Validated {
    validate_with(
        &format!("precision mediump float;\n{source}"),
        &ValidateOptions::default(),
    )
}

pub(super) fn vertex(source: &str) -> Validated {
    let options = ValidateOptions {
        stage: ShaderStage::Vertex,
        ..ValidateOptions::default()
    };
    validate_with(source, &options)
}

#[test]
fn test_minimal_fragment_shader() {
    let validated = fragment("void main() { gl_FragColor = vec4(1.0); }");
    validated.assert_valid();
    assert!(validated.output.diagnostics.is_empty());
}

#[test]
fn test_missing_main() {
    let validated = fragment("float f() { return 1.0; }");
    assert_eq!(validated.errors(), vec![ErrorCode::E2001]);
}

#[test]
fn test_main_signature() {
    let validated = fragment("int main() { return 0; }");
    validated.assert_error(ErrorCode::E2056);
}

#[test]
fn test_missing_precision() {
    let source = "void main() { float x = 1.0; gl_FragColor = vec4(x); }";
    let validated = validate_with(source, &ValidateOptions::default());
    validated.assert_error(ErrorCode::E2007);

    // Vertex shaders have a default float precision.
    vertex("void main() { float x = 1.0; gl_Position = vec4(x); }").assert_valid();
}

#[test]
fn test_reserved_prefixes() {
    fragment("float gl_thing; void main() {}").assert_error(ErrorCode::E2002);
    fragment("float webgl_thing; void main() {}").assert_error(ErrorCode::E2002);
    fragment("float _webgl_thing; void main() {}").assert_error(ErrorCode::E2002);
}

#[test]
fn test_overlong_identifier() {
    let name = "a".repeat(257);
    fragment(&format!("float {name}; void main() {{}}")).assert_error(ErrorCode::E2003);
    let name = "a".repeat(256);
    fragment(&format!("float {name}; void main() {{}}")).assert_valid();
}

#[test]
fn test_scopes() {
    fragment("float a; float a; void main() {}").assert_error(ErrorCode::E2004);
    fragment("float a; void main() { float a = 1.0; { float a = 2.0; } }").assert_valid();
    fragment("void main() { gl_FragColor = vec4(b); }").assert_error(ErrorCode::E2005);
}

#[test]
fn test_used_clamp_and_derivatives_default_off() {
    let validated = fragment("void main() { gl_FragColor = vec4(0.0); }");
    assert!(!validated.output.used_clamp);
    assert!(!validated.output.uses_derivatives);
}
