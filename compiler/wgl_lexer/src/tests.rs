use pretty_assertions::assert_eq;
use wgl_diagnostic::SourceMap;
use wgl_ir::{ShaderStage, Span, StringInterner, TokenKind, TypeKeyword};

use super::*;

fn lex_one(source: &str) -> (LexOutput, StringInterner) {
    let sources = SourceMap::single("shader", source).unwrap_or_default();
    let mut interner = StringInterner::new();
    let output = lex(&sources, &LexOptions::default(), &mut interner);
    (output, interner)
}

fn kinds(output: &LexOutput) -> Vec<TokenKind> {
    output.tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn test_declaration_tokens() {
    let (output, interner) = lex_one("uniform mediump vec4 color;");
    let color = interner.get("color");
    assert!(color.is_some());
    assert_eq!(
        kinds(&output),
        vec![
            TokenKind::Uniform,
            TokenKind::Mediump,
            TokenKind::Type(TypeKeyword::Vec(4)),
            TokenKind::Ident(color.unwrap_or_default()),
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
    assert!(!output.have_errors());
}

#[test]
fn test_literals() {
    let (output, _) = lex_one("1 0x10 1.5 .5 true");
    assert_eq!(
        kinds(&output),
        vec![
            TokenKind::Int(1),
            TokenKind::Int(16),
            TokenKind::float(1.5),
            TokenKind::float(0.5),
            TokenKind::True,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_operators() {
    let (output, _) = lex_one("a += b ^^ c <<= 1; x++ >= y");
    let ops: Vec<TokenKind> = kinds(&output)
        .into_iter()
        .filter(|k| !matches!(k, TokenKind::Ident(_) | TokenKind::Int(_)))
        .collect();
    assert_eq!(
        ops,
        vec![
            TokenKind::PlusEq,
            TokenKind::CaretCaret,
            TokenKind::ShlEq,
            TokenKind::Semicolon,
            TokenKind::PlusPlus,
            TokenKind::GtEq,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_spans_and_eof() {
    let (output, _) = lex_one("float x;");
    let spans: Vec<Span> = output.tokens.iter().map(|t| t.span).collect();
    assert_eq!(
        spans,
        vec![Span::new(0, 5), Span::new(6, 7), Span::new(7, 8), Span::point(8)]
    );
}

#[test]
fn test_comments_are_skipped() {
    let (output, _) = lex_one("// header\nfloat /* inline */ x;");
    assert_eq!(output.tokens.len(), 4);
}

#[test]
fn test_reserved_word_error() {
    let (output, _) = lex_one("static float x;");
    assert!(output.have_errors());
    let first = output.first_error().map(|e| e.kind.clone());
    assert_eq!(first, Some(LexErrorKind::ReservedWord("static".into())));
    assert_eq!(output.tokens.get(0).map(|t| t.kind), Some(TokenKind::Error));
}

#[test]
fn test_invalid_number_error() {
    let (output, _) = lex_one("int x = 09;");
    assert_eq!(
        output.first_error().map(|e| e.kind.clone()),
        Some(LexErrorKind::InvalidNumber("09".into()))
    );
}

#[test]
fn test_unterminated_comment() {
    let (output, _) = lex_one("float x; /* open");
    assert_eq!(
        output.first_error().map(|e| (e.kind.clone(), e.span)),
        Some((LexErrorKind::UnterminatedComment, Span::new(9, 11)))
    );
}

#[test]
fn test_errors_in_source_order() {
    let (output, _) = lex_one("@ float static;");
    let kinds: Vec<LexErrorKind> = output.errors.iter().map(|e| e.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            LexErrorKind::InvalidCharacter('@'),
            LexErrorKind::ReservedWord("static".into()),
        ]
    );
}

#[test]
fn test_warnings_do_not_fail() {
    let (output, _) = lex_one("#extension GL_EXT_foo : warn\nfloat x;");
    assert!(!output.have_errors());
    assert_eq!(output.warnings().count(), 1);
    assert_eq!(output.first_error(), None);
}

#[test]
fn test_multiple_fragments_share_offsets() {
    let mut sources = SourceMap::new();
    assert!(sources.add_fragment("a", "#define X 2\n").is_ok());
    assert!(sources.add_fragment("b", "int y = X;").is_ok());
    let mut interner = StringInterner::new();
    let options = LexOptions {
        stage: ShaderStage::Vertex,
        ..LexOptions::default()
    };
    let output = lex(&sources, &options, &mut interner);
    assert!(!output.have_errors());
    let first = output.tokens.get(0).map(|t| t.span.start);
    assert_eq!(first, Some(sources.fragments()[1].start));
    assert!(kinds(&output).contains(&TokenKind::Int(2)));
}
