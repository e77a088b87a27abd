//! WGL Fmt
//!
//! Text output for validated shaders.
//!
//! # Architecture
//!
//! - [`emitter`]: where text goes, a `String` or any `io::Write`
//! - [`scopes`]: precedence-aware parenthesization
//! - [`printer`]: the AST walk, generic over a [`Dialect`]
//!
//! Printing never fails: the validator has already rejected anything the
//! printer could not render. Output re-parses to an equivalent AST, though
//! not to the same text: comments, blank lines and redundant parentheses
//! are gone, and folded array sizes replace their expressions.

pub mod emitter;
pub mod printer;
pub mod scopes;

pub use emitter::{Emitter, FileEmitter, StringEmitter, INDENT_WIDTH};
pub use printer::{format_float, Dialect, Glsl, PrintOptions, Printer};
pub use scopes::{OpScopes, Operand};

use wgl_ir::{StringInterner, TranslationUnit};

/// Print `unit` as GLSL into `out`.
#[tracing::instrument(level = "debug", skip_all, fields(format = %options.output_format))]
pub fn print_unit_to(
    out: &mut dyn Emitter,
    unit: &TranslationUnit,
    interner: &StringInterner,
    options: PrintOptions,
) {
    let mut printer = Printer::new(unit, interner, options, Glsl, out);
    printer.print_unit();
    tracing::trace!(decls = unit.decls.len(), "printed translation unit");
}

/// Print `unit` as GLSL.
pub fn print_unit(unit: &TranslationUnit, interner: &StringInterner, options: PrintOptions) -> String {
    let mut out = StringEmitter::new();
    print_unit_to(&mut out, unit, interner, options);
    out.trim_trailing_blank_lines();
    out.ensure_trailing_newline();
    out.output()
}
