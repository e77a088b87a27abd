//! Property-based tests for the GLSL printer.
//!
//! Random expressions, fully parenthesized, are parsed and printed. The
//! printed text must:
//! 1. re-parse to a tree of the same shape, so dropped parentheses were
//!    redundant and kept ones were needed
//! 2. print identically a second time

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::uninlined_format_args,
    clippy::needless_pass_by_value,
    reason = "Proptest macros generate code with these patterns"
)]

use std::fmt::Write as _;

use proptest::prelude::*;
use wgl_diagnostic::SourceMap;
use wgl_fmt::{print_unit, PrintOptions};
use wgl_ir::{
    DeclKind, ExprId, ExprKind, Literal, ShaderStage, StmtKind, StringInterner, TokenKind,
    TranslationUnit,
};
use wgl_lexer::{lex, LexOptions};
use wgl_parse::{parse, ParseOptions};

// -- Code Generation Strategies --

fn identifier_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d", "e"]).prop_map(str::to_owned)
}

fn float_literal_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..1000).prop_map(|n| format!("{}.5", n)),
        (1u32..10, -5i32..5).prop_map(|(m, e)| format!("{}e{}", m, e)),
    ]
}

fn binary_operator_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "+", "-", "*", "/", "<", ">", "<=", ">=", "==", "!=", "&&", "||", "^^",
    ])
}

/// Every composite form is wrapped in parentheses; the printer decides
/// which ones survive.
fn expr_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![identifier_strategy(), float_literal_strategy()];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), binary_operator_strategy(), inner.clone())
                .prop_map(|(l, op, r)| format!("({} {} {})", l, op, r)),
            inner.clone().prop_map(|e| format!("(-({}))", e)),
            inner.clone().prop_map(|e| format!("(!({}))", e)),
            inner.clone().prop_map(|e| format!("(++({}))", e)),
            inner.clone().prop_map(|e| format!("(({})--)", e)),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(c, t, e)| format!("(({}) ? ({}) : ({}))", c, t, e)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("(({}), ({}))", l, r)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("f(({}), ({}))", a, b)),
            // `3.5.x` would lex as one malformed number.
            inner
                .clone()
                .prop_filter("literal base", |e| !e.starts_with(|c: char| c.is_ascii_digit()))
                .prop_map(|e| format!("(({}).x)", e)),
            (identifier_strategy(), inner.clone())
                .prop_map(|(base, index)| format!("({}[({})])", base, index)),
            (identifier_strategy(), inner).prop_map(|(l, r)| format!("({} = ({}))", l, r)),
        ]
    })
}

// -- Helpers --

fn parse_unit(source: &str) -> (TranslationUnit, StringInterner) {
    let sources = SourceMap::single("prop", source).unwrap();
    let mut interner = StringInterner::new();
    let options = LexOptions {
        stage: ShaderStage::Fragment,
        support_highp_fragment: true,
        support_oes_derivatives: false,
    };
    let lexed = lex(&sources, &options, &mut interner);
    assert!(!lexed.have_errors(), "lex errors in {source:?}: {:?}", lexed.errors);
    let parsed = parse(&lexed.tokens, &mut interner, &ParseOptions::default());
    assert!(!parsed.have_errors(), "parse errors in {source:?}: {:?}", parsed.errors);
    (parsed.unit, interner)
}

/// The expression of the single statement in `main`.
fn main_expr(unit: &TranslationUnit) -> ExprId {
    let Some(DeclKind::Function { body, .. }) = unit.decls.first().map(|d| &d.kind) else {
        panic!("expected a function");
    };
    let StmtKind::Body(stmts) = &unit.stmt(*body).kind else {
        panic!("expected a block");
    };
    let StmtKind::Expr(expr) = unit.stmt(stmts[0]).kind else {
        panic!("expected an expression statement");
    };
    expr
}

/// Parenthesization-independent rendering of a tree.
fn shape(unit: &TranslationUnit, interner: &StringInterner, id: ExprId, out: &mut String) {
    match &unit.expr(id).kind {
        ExprKind::Literal(Literal::Float(v)) => write!(out, "{v:?}").unwrap(),
        ExprKind::Literal(other) => write!(out, "{other:?}").unwrap(),
        ExprKind::Var { name, .. } => out.push_str(interner.lookup(*name)),
        ExprKind::TypeConstructor(ty) => write!(out, "{ty:?}").unwrap(),
        ExprKind::Call { callee, args } => {
            out.push_str("(call ");
            shape(unit, interner, *callee, out);
            for &arg in args {
                out.push(' ');
                shape(unit, interner, arg, out);
            }
            out.push(')');
        }
        ExprKind::Binary { op, lhs, rhs } => {
            write!(out, "({} ", op.as_symbol()).unwrap();
            shape(unit, interner, *lhs, out);
            out.push(' ');
            shape(unit, interner, *rhs, out);
            out.push(')');
        }
        ExprKind::Unary { op, operand } => {
            write!(out, "({} ", op.as_symbol()).unwrap();
            shape(unit, interner, *operand, out);
            out.push(')');
        }
        ExprKind::Post { op, operand } => {
            out.push('(');
            shape(unit, interner, *operand, out);
            write!(out, " {})", op.as_symbol()).unwrap();
        }
        ExprKind::Assign { op, lhs, rhs } => {
            write!(out, "(= {op:?} ").unwrap();
            shape(unit, interner, *lhs, out);
            out.push(' ');
            shape(unit, interner, *rhs, out);
            out.push(')');
        }
        ExprKind::Conditional {
            cond,
            then_expr,
            else_expr,
        } => {
            out.push_str("(? ");
            shape(unit, interner, *cond, out);
            out.push(' ');
            shape(unit, interner, *then_expr, out);
            out.push(' ');
            shape(unit, interner, *else_expr, out);
            out.push(')');
        }
        ExprKind::Index { base, index } => {
            out.push_str("([] ");
            shape(unit, interner, *base, out);
            out.push(' ');
            shape(unit, interner, *index, out);
            out.push(')');
        }
        ExprKind::Select { base, field } => {
            out.push_str("(. ");
            shape(unit, interner, *base, out);
            write!(out, " {})", interner.lookup(*field)).unwrap();
        }
        ExprKind::Sequence { lhs, rhs } => {
            out.push_str("(, ");
            shape(unit, interner, *lhs, out);
            out.push(' ');
            shape(unit, interner, *rhs, out);
            out.push(')');
        }
    }
}

fn main_shape(source: &str) -> (String, String) {
    let (unit, interner) = parse_unit(source);
    let mut rendered = String::new();
    shape(&unit, &interner, main_expr(&unit), &mut rendered);
    let printed = print_unit(&unit, &interner, PrintOptions::default());
    (rendered, printed)
}

/// `++` / `--` nodes in a shape rendering; no other operator renders with
/// a doubled sign.
fn step_operators_in_tree(shape: &str) -> usize {
    shape.matches("++").count() + shape.matches("--").count()
}

/// `++` / `--` tokens the lexer finds in printed text.
fn step_tokens(printed: &str) -> usize {
    let sources = SourceMap::single("printed", printed).unwrap();
    let mut interner = StringInterner::new();
    let lexed = lex(&sources, &LexOptions::default(), &mut interner);
    lexed
        .tokens
        .iter()
        .filter(|t| matches!(t.kind, TokenKind::PlusPlus | TokenKind::MinusMinus))
        .count()
}

// -- Properties --

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn printed_expressions_keep_their_shape(expr in expr_strategy()) {
        let source = format!("void main() {{ {}; }}", expr);
        let (original_shape, printed) = main_shape(&source);
        let (reparsed_shape, reprinted) = main_shape(&printed);
        prop_assert_eq!(original_shape, reparsed_shape);
        prop_assert_eq!(printed, reprinted);
    }

    #[test]
    fn printed_output_never_fuses_signs(expr in expr_strategy()) {
        let source = format!("void main() {{ {}; }}", expr);
        let (shape, printed) = main_shape(&source);
        // `- -a` must not collapse into a decrement, nor `a - -b` into
        // `a -- b`; stacked postfix steps like `a----` are fine.
        prop_assert_eq!(step_operators_in_tree(&shape), step_tokens(&printed));
    }
}

#[test]
fn test_stacked_postfix_decrements() {
    let (shape, printed) = main_shape("void main() { ((((a)--))--); }");
    assert_eq!(shape, "((a --) --)");
    assert!(printed.contains("a----;"), "{printed}");
    assert_eq!(step_tokens(&printed), 2);
}

#[test]
fn test_negated_decrement_keeps_its_space() {
    let (shape, printed) = main_shape("void main() { (-(--a)); (b - (-c)); }");
    assert_eq!(step_operators_in_tree(&shape), 1);
    assert_eq!(step_tokens(&printed), 1, "{printed}");
}
