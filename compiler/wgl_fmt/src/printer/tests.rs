use pretty_assertions::assert_eq;
use wgl_diagnostic::SourceMap;
use wgl_ir::{
    BasicType, DeclKind, ExprKind, Literal, OutputFormat, ShaderStage, Span, StmtKind, StringInterner,
    TranslationUnit, Type,
};
use wgl_lexer::{lex, LexOptions};
use wgl_parse::{parse, ParseOptions};

use super::*;
use crate::{print_unit, StringEmitter};

fn parse_source(source: &str, stage: ShaderStage) -> (TranslationUnit, StringInterner) {
    let sources = SourceMap::single("test", source).unwrap_or_default();
    let mut interner = StringInterner::new();
    let options = LexOptions {
        stage,
        support_highp_fragment: true,
        support_oes_derivatives: true,
    };
    let lexed = lex(&sources, &options, &mut interner);
    assert!(!lexed.have_errors(), "lex errors: {:?}", lexed.errors);
    let parsed = parse(&lexed.tokens, &mut interner, &ParseOptions::default());
    assert!(!parsed.have_errors(), "parse errors: {:?}", parsed.errors);
    (parsed.unit, interner)
}

fn reprint(source: &str, options: PrintOptions) -> String {
    let (unit, interner) = parse_source(source, options.stage);
    print_unit(&unit, &interner, options)
}

/// Print the single statement in `void main() { <source>; }`.
fn reprint_expr(source: &str) -> String {
    let (unit, interner) = parse_source(
        &format!("void main() {{ {source}; }}"),
        ShaderStage::Fragment,
    );
    let Some(DeclKind::Function { body, .. }) = unit.decls.first().map(|d| &d.kind) else {
        panic!("expected main");
    };
    let StmtKind::Body(stmts) = &unit.stmt(*body).kind else {
        panic!("expected a block");
    };
    let mut out = StringEmitter::new();
    {
        let mut printer = Printer::new(&unit, &interner, PrintOptions::default(), Glsl, &mut out);
        printer.print_stmt(stmts[0]);
        assert_eq!(printer.scopes.depth(), 0);
    }
    let text = out.output();
    text.strip_suffix(';').unwrap_or(&text).to_owned()
}

#[test]
fn test_minimal_fragment_shader() {
    let printed = reprint(
        "precision mediump float; void main(){gl_FragColor=vec4(1.0);}",
        PrintOptions::default(),
    );
    assert_eq!(
        printed,
        "precision mediump float;\n\nvoid main() {\n    gl_FragColor = vec4(1.0);\n}\n"
    );
}

#[test]
fn test_no_redundant_parentheses() {
    for source in [
        "a + b * c",
        "a * b + c",
        "a - b - c",
        "a = b = c",
        "a ? b : c ? d : e",
        "x = a < b == c > d",
        "a || b ^^ c && d",
        "-a * b",
        "a++ + ++b",
        "a[i + 1].x",
        "f(a, b).y",
        "vec2(1.0, 2.0).y",
        "a, b, c",
        "!a || b",
        "x += a ? b : c",
    ] {
        assert_eq!(reprint_expr(source), source);
    }
}

#[test]
fn test_required_parentheses_are_kept() {
    for source in [
        "(a + b) * c",
        "a - (b - c)",
        "a / (b * c)",
        "(a ? b : c) ? d : e",
        "-(a + b)",
        "(a + b).x",
        "(a || b) && c",
        "a == (b == c)",
        "f((a, b), c)",
        "a, (b, c)",
        "a ? b : (c = d)",
        "(a = b) = c",
        "!(a && b)",
    ] {
        assert_eq!(reprint_expr(source), source);
    }
}

#[test]
fn test_redundant_parentheses_are_dropped() {
    assert_eq!(reprint_expr("(a - b) - c"), "a - b - c");
    assert_eq!(reprint_expr("a + (b * c)"), "a + b * c");
    assert_eq!(reprint_expr("(a, b), c"), "a, b, c");
    assert_eq!(reprint_expr("x = (a ? b : c)"), "x = a ? b : c");
    assert_eq!(reprint_expr("((a))[(i)]"), "a[i]");
    assert_eq!(reprint_expr("a ? (b, c) : d"), "a ? b, c : d");
    assert_eq!(reprint_expr("m[(i, j)]"), "m[i, j]");
    assert_eq!(reprint_expr("(a == b) == c"), "a == b == c");
}

#[test]
fn test_adjacent_signs_stay_apart() {
    assert_eq!(reprint_expr("-(-a)"), "- -a");
    assert_eq!(reprint_expr("-(--a)"), "- --a");
    assert_eq!(reprint_expr("+(+a)"), "+ +a");
    assert_eq!(reprint_expr("-(+a)"), "-+a");
    assert_eq!(reprint_expr("a - -b"), "a - -b");
}

#[test]
fn test_literals() {
    assert_eq!(reprint_expr("x = 2.0"), "x = 2.0");
    assert_eq!(reprint_expr("x = .5"), "x = 0.5");
    assert_eq!(reprint_expr("x = 1e20"), "x = 1e20");
    assert_eq!(reprint_expr("x = 1.5e-7"), "x = 1.5e-7");
    assert_eq!(reprint_expr("x = 0x10"), "x = 16");
    assert_eq!(reprint_expr("x = 7u"), "x = 7u");
    assert_eq!(reprint_expr("x = true"), "x = true");
}

#[test]
fn test_format_float() {
    assert_eq!(format_float(1.0), "1.0");
    assert_eq!(format_float(0.25), "0.25");
    assert_eq!(format_float(-3.0), "-3.0");
    assert_eq!(format_float(1e-9), "1e-9");
}

#[test]
fn test_folded_literals() {
    let mut unit = TranslationUnit::new();
    let interner = StringInterner::new();
    let negative = unit.alloc_expr(ExprKind::float(-0.5), Span::DUMMY);
    let select = unit.alloc_expr(
        ExprKind::Unary {
            op: wgl_ir::UnaryOp::Neg,
            operand: negative,
        },
        Span::DUMMY,
    );
    let composite = unit.alloc_expr(
        ExprKind::Literal(Literal::Composite {
            ty: Box::new(Type::vector(BasicType::Int, 2)),
            values: vec![1.0, -2.0],
        }),
        Span::DUMMY,
    );
    let min = unit.alloc_expr(ExprKind::int(i32::MIN), Span::DUMMY);

    let mut out = StringEmitter::new();
    {
        let mut printer = Printer::new(&unit, &interner, PrintOptions::default(), Glsl, &mut out);
        printer.print_expr_top(select);
        printer.emit("; ");
        printer.print_expr_top(composite);
        printer.emit("; ");
        printer.print_expr_top(min);
    }
    assert_eq!(out.output(), "- -0.5; ivec2(1, -2); 0x80000000");
}

#[test]
fn test_statement_layout() {
    let printed = reprint(
        "void main() {
            if (a) b = 1.0; else { b = 2.0; }
            if (a) { b = 1.0; } else if (c) { b = 3.0; }
            for (int i = 0; i < 3; i++) x += 1.0;
            for (;;) { break; }
            float p, q = 1.0, r[2];
            do { x -= 1.0; } while (x > 0.0);
            while (true) discard;
            return;
        }",
        PrintOptions::default(),
    );
    assert_eq!(
        printed,
        "void main() {
    if (a)
        b = 1.0;
    else {
        b = 2.0;
    }
    if (a) {
        b = 1.0;
    } else if (c) {
        b = 3.0;
    }
    for (int i = 0; i < 3; i++)
        x += 1.0;
    for (;;) {
        break;
    }
    float p, q = 1.0, r[2];
    do {
        x -= 1.0;
    } while (x > 0.0);
    while (true)
        discard;
    return;
}
"
    );
}

#[test]
fn test_switch() {
    let printed = reprint(
        "void main() { switch (i) { case 1: x = 1.0; break; default: break; } }",
        PrintOptions::default(),
    );
    assert_eq!(
        printed,
        "void main() {
    switch (i) {
        case 1:
        x = 1.0;
        break;
        default:
        break;
    }
}
"
    );
}

#[test]
fn test_declarations() {
    let printed = reprint(
        "struct Light { vec3 color; mediump float power[2]; } light, lights[3];
         uniform sampler2D tex;
         invariant varying vec4 v;
         invariant gl_Position;
         float f(in float x, out vec2 y[2], const int z);
         float g(void) { return 1.0; }
         void main() {}",
        PrintOptions {
            stage: ShaderStage::Vertex,
            ..PrintOptions::default()
        },
    );
    assert_eq!(
        printed,
        "struct Light {
    vec3 color;
    mediump float power[2];
} light;
Light lights[3];
uniform sampler2D tex;
invariant varying vec4 v;
invariant gl_Position;
float f(in float x, out vec2 y[2], const int z);

float g() {
    return 1.0;
}

void main() {
}
"
    );
}

#[test]
fn test_precision_is_downgraded_without_highp_fragments() {
    let source = "precision highp float; uniform highp vec2 u; void main() {}";
    let fragment = PrintOptions {
        support_highp_fragment: false,
        ..PrintOptions::default()
    };
    assert_eq!(
        reprint(source, fragment),
        "precision mediump float;\nuniform mediump vec2 u;\n\nvoid main() {\n}\n"
    );

    let vertex = PrintOptions {
        stage: ShaderStage::Vertex,
        ..fragment
    };
    assert_eq!(
        reprint(source, vertex),
        "precision highp float;\nuniform highp vec2 u;\n\nvoid main() {\n}\n"
    );
}

#[test]
fn test_precision_is_dropped_for_desktop_glsl() {
    let options = PrintOptions {
        output_format: OutputFormat::Glsl,
        ..PrintOptions::default()
    };
    assert_eq!(
        reprint(
            "precision mediump float; uniform lowp vec2 u; void main() { highp float x; }",
            options
        ),
        "uniform vec2 u;\n\nvoid main() {\n    float x;\n}\n"
    );
}

#[test]
fn test_printed_precision() {
    let options = PrintOptions {
        support_highp_fragment: false,
        ..PrintOptions::default()
    };
    assert_eq!(options.printed_precision(Precision::None), None);
    assert_eq!(options.printed_precision(Precision::Low), Some(Precision::Low));
    assert_eq!(
        options.printed_precision(Precision::High),
        Some(Precision::Medium)
    );
}

#[test]
fn test_reprint_is_stable() {
    let source = "precision mediump float;
        varying vec2 uv;
        uniform sampler2D tex;
        vec4 shade(vec4 c, float k) { return c * (1.0 - k) + vec4(k); }
        void main() {
            vec4 c = texture2D(tex, uv.st);
            for (int i = 0; i < 4; ++i) { c = shade(c, float(i) / 4.0); }
            gl_FragColor = c.a > 0.5 ? c : vec4(0.0, 0.0, 0.0, 1.0);
        }";
    let once = reprint(source, PrintOptions::default());
    let twice = reprint(&once, PrintOptions::default());
    assert_eq!(once, twice);
}
