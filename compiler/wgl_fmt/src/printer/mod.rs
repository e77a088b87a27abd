//! Printer core.
//!
//! [`Printer`] renders the AST through an [`Emitter`]. It is generic over a
//! [`Dialect`]: the shared rendering is GLSL, and a dialect overrides only
//! the node kinds it spells differently. The HLSL generator is such a
//! dialect.
//!
//! # Modules
//!
//! - [`expr`]: expressions and literals
//! - [`stmt`]: statements and blocks
//! - [`decl`]: declarations and types

mod decl;
mod expr;
mod stmt;
#[cfg(test)]
mod tests;

use std::fmt;

use wgl_ir::{
    ExprId, Name, OutputFormat, PrecAssoc, Precision, ShaderStage, StringInterner, TranslationUnit,
    TypeKind,
};

pub use expr::format_float;

use crate::{Emitter, OpScopes, Operand};

/// Target options that affect printed text.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct PrintOptions {
    pub output_format: OutputFormat,
    pub stage: ShaderStage,
    /// Whether the target supports `highp` in fragment shaders.
    pub support_highp_fragment: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            output_format: OutputFormat::GlslEs,
            stage: ShaderStage::Fragment,
            support_highp_fragment: true,
        }
    }
}

impl PrintOptions {
    /// The precision to print in place of `precision`, or `None` to print
    /// no qualifier.
    ///
    /// Only GLSL ES has precision qualifiers. Fragment shaders without
    /// `highp` support get `mediump` instead.
    pub fn printed_precision(&self, precision: Precision) -> Option<Precision> {
        if precision == Precision::None || self.output_format != OutputFormat::GlslEs {
            return None;
        }
        if precision == Precision::High
            && !self.stage.is_vertex()
            && !self.support_highp_fragment
        {
            return Some(Precision::Medium);
        }
        Some(precision)
    }
}

/// Spelling differences between output languages.
///
/// Every method has the GLSL behavior as its default.
pub trait Dialect: Sized {
    /// Print expression `id` as operand `operand` of the current scope.
    /// Returns `false` to use the shared rendering.
    fn print_expr(printer: &mut Printer<'_, Self>, id: ExprId, operand: Operand) -> bool {
        let _ = (printer, id, operand);
        false
    }

    /// Spelling of a basic, vector, matrix or sampler type.
    fn type_name(&self, kind: &TypeKind) -> &'static str {
        match kind {
            TypeKind::Basic(b) => b.as_str(),
            TypeKind::Vector(v) => v.as_str(),
            TypeKind::Matrix(m) => m.as_str(),
            TypeKind::Sampler(s) => s.as_str(),
            TypeKind::Name(_) | TypeKind::Array(_) | TypeKind::Struct(_) => {
                debug_assert!(false, "type_name on a composite type");
                ""
            }
        }
    }
}

/// GLSL and GLSL ES output.
#[derive(Copy, Clone, Default, Debug)]
pub struct Glsl;

impl Dialect for Glsl {}

pub struct Printer<'a, D: Dialect = Glsl> {
    pub unit: &'a TranslationUnit,
    pub interner: &'a StringInterner,
    pub options: PrintOptions,
    pub dialect: D,
    pub scopes: OpScopes,
    out: &'a mut dyn Emitter,
    indent: usize,
}

impl<'a, D: Dialect> Printer<'a, D> {
    pub fn new(
        unit: &'a TranslationUnit,
        interner: &'a StringInterner,
        options: PrintOptions,
        dialect: D,
        out: &'a mut dyn Emitter,
    ) -> Self {
        Printer {
            unit,
            interner,
            options,
            dialect,
            scopes: OpScopes::new(),
            out,
            indent: 0,
        }
    }

    #[inline]
    pub fn emit(&mut self, text: &str) {
        self.out.emit(text);
    }

    pub fn emit_fmt(&mut self, args: fmt::Arguments<'_>) {
        self.out.emit_fmt(args);
    }

    pub fn newline(&mut self) {
        self.out.emit_newline();
    }

    /// Indentation for the current nesting level.
    pub fn start_line(&mut self) {
        self.out.emit_indent(self.indent);
    }

    /// Emit `text` as a complete line at the current indentation.
    pub fn line(&mut self, text: &str) {
        self.start_line();
        self.emit(text);
        self.newline();
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "unbalanced indentation");
        self.indent = self.indent.saturating_sub(1);
    }

    #[inline]
    pub fn name(&self, name: Name) -> &'a str {
        self.interner.lookup(name)
    }

    pub fn emit_name(&mut self, name: Name) {
        let text = self.name(name);
        self.emit(text);
    }

    /// See [`OpScopes::enter_op_scope`].
    pub fn enter_op_scope(&mut self, op: PrecAssoc, operand: Operand) {
        self.scopes.enter_op_scope(self.out, op, operand);
    }

    pub fn leave_op_scope(&mut self) {
        self.scopes.leave_op_scope(self.out);
    }

    /// See [`OpScopes::enter_arg_list_scope`].
    pub fn enter_arg_list_scope(&mut self) {
        self.scopes.enter_arg_list_scope(self.out);
    }

    pub fn leave_arg_list_scope(&mut self) {
        self.scopes.leave_arg_list_scope(self.out);
    }

    /// Print every top-level declaration, one per line, with blank lines
    /// around function definitions.
    pub fn print_unit(&mut self) {
        let unit = self.unit;
        let mut previous_was_function = false;
        for (index, decl) in unit.decls.iter().enumerate() {
            let is_function = matches!(decl.kind, wgl_ir::DeclKind::Function { .. });
            if index > 0 && (is_function || previous_was_function) {
                self.newline();
            }
            self.start_line();
            if self.print_decl(decl) {
                self.newline();
            }
            previous_was_function = is_function;
        }
    }
}
