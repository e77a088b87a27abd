use pretty_assertions::assert_eq;
use wgl_diagnostic::SourceMap;
use wgl_ir::{ShaderStage, StringInterner};

use super::{Preprocessed, Preprocessor};
use crate::extensions::{Extension, ExtensionBehavior};
use crate::raw_token::RawToken;
use crate::{LexErrorKind, LexOptions};

struct Run {
    text: String,
    errors: Vec<LexErrorKind>,
    result: Preprocessed,
}

fn run_fragments(fragments: &[&str], options: &LexOptions) -> Run {
    let mut sources = SourceMap::new();
    for (index, fragment) in fragments.iter().enumerate() {
        assert!(sources.add_fragment(format!("f{index}"), *fragment).is_ok());
    }
    let mut interner = StringInterner::new();
    let result = Preprocessor::new(&sources, options, &mut interner).run();
    let text = result
        .tokens
        .iter()
        .map(|t| match t.raw {
            RawToken::Ident | RawToken::Number => interner.lookup(t.text).to_owned(),
            raw => raw.punct_str().to_owned(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    let errors = result.errors.iter().map(|e| e.kind.clone()).collect();
    Run {
        text,
        errors,
        result,
    }
}

fn run(source: &str) -> Run {
    run_fragments(&[source], &LexOptions::default())
}

#[test]
fn test_object_macro() {
    let out = run("#define N 4\nfloat a[N];");
    assert_eq!(out.text, "float a [ 4 ] ;");
    assert!(out.errors.is_empty());
}

#[test]
fn test_function_macro() {
    let out = run("#define SQR(x) ((x)*(x))\nSQR(a+1)");
    assert_eq!(out.text, "( ( a + 1 ) * ( a + 1 ) )");
}

#[test]
fn test_nested_function_macros() {
    let out = run("#define ADD(a,b) a+b\n#define TWICE(x) ADD(x,x)\nTWICE(1)");
    assert_eq!(out.text, "1 + 1");
}

#[test]
fn test_function_macro_without_call_is_plain_identifier() {
    let out = run("#define F(x) x\nF;");
    assert_eq!(out.text, "F ;");
}

#[test]
fn test_space_before_paren_makes_object_macro() {
    let out = run("#define G (1)\nG");
    assert_eq!(out.text, "( 1 )");
}

#[test]
fn test_self_reference_terminates() {
    assert_eq!(run("#define foo foo + 1\nfoo").text, "foo + 1");
    assert_eq!(run("#define a b\n#define b a\na").text, "a");
}

#[test]
fn test_conditionals() {
    let out = run("#if 1+1 == 2\na\n#elif 1\nb\n#else\nc\n#endif");
    assert_eq!(out.text, "a");

    let out = run("#ifdef GL_ES\nx\n#endif\n#ifndef GL_ES\ny\n#endif");
    assert_eq!(out.text, "x");

    let out = run("#if 0\n#if 1\na\n#endif\n#else\nb\n#endif");
    assert_eq!(out.text, "b");

    let out = run("#if 0\na\n#elif 2 > 1\nb\n#elif 1\nc\n#endif");
    assert_eq!(out.text, "b");
}

#[test]
fn test_defined_operator() {
    let out = run("#if defined(GL_ES) && !defined FOO\nyes\n#endif");
    assert_eq!(out.text, "yes");
    assert!(out.errors.is_empty());
}

#[test]
fn test_if_expression_operators() {
    let out = run("#if (7 % 4) * 2 == 6 && (1 << 3) == 8 && -1 < 0 && ~0 == -1\nok\n#endif");
    assert_eq!(out.text, "ok");
}

#[test]
fn test_line_file_version() {
    let out = run_fragments(&["a\n__LINE__ __FILE__", "__FILE__ __VERSION__"], &LexOptions::default());
    assert_eq!(out.text, "a 2 0 1 100");
}

#[test]
fn test_precision_high_macro() {
    let options = LexOptions {
        stage: ShaderStage::Fragment,
        support_highp_fragment: true,
        ..LexOptions::default()
    };
    let out = run_fragments(&["#ifdef GL_FRAGMENT_PRECISION_HIGH\nhigh\n#endif"], &options);
    assert_eq!(out.text, "high");

    let out = run("#ifdef GL_FRAGMENT_PRECISION_HIGH\nhigh\n#endif");
    assert_eq!(out.text, "");
}

#[test]
fn test_directive_errors() {
    let out = run("#error bad thing\n#foo");
    assert_eq!(
        out.errors,
        vec![
            LexErrorKind::ErrorDirective("bad thing".into()),
            LexErrorKind::UnknownDirective("foo".into()),
        ]
    );
}

#[test]
fn test_unbalanced_conditionals() {
    assert_eq!(
        run("#endif").errors,
        vec![LexErrorKind::UnbalancedConditional("#endif without #if")]
    );
    assert_eq!(
        run("#if 1\na").errors,
        vec![LexErrorKind::UnbalancedConditional(
            "unterminated conditional directive"
        )]
    );
    assert_eq!(
        run("#if 1\n#else\n#else\n#endif").errors,
        vec![LexErrorKind::UnbalancedConditional("#else after #else")]
    );
}

#[test]
fn test_redefinition() {
    assert!(run("#define A 1\n#define A 1").errors.is_empty());
    assert_eq!(
        run("#define A 1\n#define A 2").errors,
        vec![LexErrorKind::MacroMismatch("A".into())]
    );
    assert_eq!(
        run("#define GL_FOO 1").errors,
        vec![LexErrorKind::ReservedMacroName("GL_FOO".into())]
    );
    assert_eq!(
        run("#undef __LINE__").errors,
        vec![LexErrorKind::ReservedMacroName("__LINE__".into())]
    );
}

#[test]
fn test_undef() {
    assert_eq!(run("#define A 1\n#undef A\nA").text, "A");
}

#[test]
fn test_macro_argument_errors() {
    assert_eq!(
        run("#define F(x) x\nF(1,2)").errors,
        vec![LexErrorKind::MacroArguments {
            name: "F".into(),
            expected: 1,
            found: 2,
        }]
    );
    assert_eq!(
        run("#define F(x) x\nF(1\n)").errors,
        vec![LexErrorKind::UnterminatedInvocation("F".into())]
    );
}

#[test]
fn test_if_expression_errors() {
    let errors = run("#if X\n#endif").errors;
    assert!(matches!(errors.as_slice(), [LexErrorKind::DirectiveSyntax(m)] if m.contains("undefined identifier `X`")));

    let errors = run("#if 1/0\n#endif").errors;
    assert_eq!(
        errors,
        vec![LexErrorKind::DirectiveSyntax("division by zero".into())]
    );
}

#[test]
fn test_version() {
    assert!(run("#version 100\nx").errors.is_empty());
    assert_eq!(
        run("x\n#version 100").errors,
        vec![LexErrorKind::VersionNotFirst]
    );
    assert_eq!(
        run("#version 300").errors,
        vec![LexErrorKind::VersionUnsupported("300".into())]
    );
}

#[test]
fn test_extensions() {
    let options = LexOptions {
        stage: ShaderStage::Fragment,
        support_oes_derivatives: true,
        ..LexOptions::default()
    };
    let out = run_fragments(
        &["#extension GL_OES_standard_derivatives : enable\n#ifdef GL_OES_standard_derivatives\nok\n#endif"],
        &options,
    );
    assert!(out.errors.is_empty());
    assert_eq!(out.text, "ok");
    assert_eq!(
        out.result.extensions.behavior(Extension::OesStandardDerivatives),
        Some(ExtensionBehavior::Enable)
    );

    // Not supported without the flag.
    let out = run("#extension GL_OES_standard_derivatives : require");
    assert_eq!(
        out.errors,
        vec![LexErrorKind::ExtensionNotSupported(
            "GL_OES_standard_derivatives".into()
        )]
    );

    let out = run("#extension GL_EXT_unknown : warn");
    assert_eq!(
        out.errors,
        vec![LexErrorKind::ExtensionWarnNotSupported("GL_EXT_unknown".into())]
    );

    let out = run("#extension all : enable");
    assert_eq!(
        out.errors,
        vec![LexErrorKind::ExtensionDirective(
            "`all` cannot be used with `enable`".into()
        )]
    );
}

#[test]
fn test_skipped_region_ignores_invalid_characters() {
    assert!(run("#if 0\n@ $\n#bogus\n#endif").errors.is_empty());
    assert_eq!(
        run("@").errors,
        vec![LexErrorKind::InvalidCharacter('@')]
    );
}
