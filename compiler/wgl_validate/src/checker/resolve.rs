//! Type resolution, array lengths and default precision.
//!
//! Declared types in the AST keep struct references by name. The checker
//! works on resolved copies, where every name is replaced by its struct
//! definition, and writes folded array lengths and inherited precisions back
//! into the AST so the printers can use them.

use wgl_diagnostic::ErrorCode;
use wgl_ir::{ArrayLength, ArrayType, Field, Name, Precision, Span, StructType, Type, TypeKind};

use super::Checker;
use crate::scope::PrecisionKey;
use crate::types::{is_es100_type, is_int_scalar};

impl Checker<'_> {
    /// Resolved copy of a declared type. Reports `UNKNOWN_TYPE` and returns
    /// `None` for an undeclared struct name.
    pub(crate) fn resolve_type(&mut self, ty: &Type, span: Span) -> Option<Type> {
        let kind = match &ty.kind {
            TypeKind::Name(tag) => {
                let Some(found) = self.scopes.lookup_struct(*tag).cloned() else {
                    let message = format!("unknown type `{}`", self.name_str(*tag));
                    self.error(ErrorCode::E2006, span, message);
                    return None;
                };
                TypeKind::Struct(Box::new(found))
            }
            TypeKind::Struct(s) => {
                let defined = s.tag.and_then(|tag| self.scopes.lookup_struct(tag).cloned());
                match defined {
                    Some(found) => TypeKind::Struct(Box::new(found)),
                    None => {
                        let mut fields = Vec::with_capacity(s.fields.len());
                        for field in &s.fields {
                            fields.push(Field {
                                name: field.name,
                                ty: self.resolve_type(&field.ty, field.span)?,
                                span: field.span,
                            });
                        }
                        TypeKind::Struct(Box::new(StructType { tag: s.tag, fields }))
                    }
                }
            }
            TypeKind::Array(array) => TypeKind::Array(Box::new(ArrayType {
                element: self.resolve_type(&array.element, span)?,
                length: array.length.clone(),
            })),
            other => other.clone(),
        };
        Some(Type {
            kind,
            qualifier: ty.qualifier.clone(),
            precision: ty.precision,
            implicit_precision: ty.implicit_precision,
        })
    }

    /// Reject layout qualifiers and types outside GLSL ES 1.00.
    pub(crate) fn check_type_usable(&mut self, ty: &Type, span: Span) -> bool {
        if ty.qualifier.as_ref().is_some_and(|q| !q.layout.is_empty()) {
            self.error(
                ErrorCode::E2060,
                span,
                "layout qualifiers are not supported in GLSL ES 1.00",
            );
            return false;
        }
        if !is_es100_type(ty) {
            let message = format!("`{}` is not a GLSL ES 1.00 type", self.describe(ty));
            self.error(ErrorCode::E2011, span, message);
            return false;
        }
        true
    }

    /// Fold an array length in place and return it.
    ///
    /// Struct members report every problem as `ILLEGAL_NON_CONSTANT_ARRAY`.
    pub(crate) fn fold_array_length(
        &mut self,
        length: &mut ArrayLength,
        span: Span,
        in_struct: bool,
    ) -> Option<u32> {
        if let Some(value) = length.value {
            return Some(value);
        }
        let Some(expr) = length.expr else {
            self.error(ErrorCode::E2039, span, "array size must be specified");
            return None;
        };
        let ty = self.check_expr(expr)?;
        let expr_span = self.unit.expr(expr).span;

        if !is_int_scalar(&ty) {
            let code = if in_struct { ErrorCode::E2040 } else { ErrorCode::E2010 };
            let message = format!("array size must be an `int`, found `{}`", self.describe(&ty));
            self.error(code, expr_span, message);
            return None;
        }
        let folded = if self.is_constant(expr, false) {
            self.eval_const(expr).and_then(|v| v.as_int())
        } else {
            None
        };
        let Some(value) = folded else {
            let code = if in_struct { ErrorCode::E2040 } else { ErrorCode::E2037 };
            self.error(code, expr_span, "array size must be a constant expression");
            return None;
        };
        let Some(value) = u32::try_from(value).ok().filter(|&v| v > 0) else {
            let code = if in_struct { ErrorCode::E2040 } else { ErrorCode::E2038 };
            let message = format!("array size must be greater than zero, found {value}");
            self.error(code, expr_span, message);
            return None;
        };
        length.value = Some(value);
        Some(value)
    }

    /// Fold the length of every array in a declared type.
    pub(crate) fn fold_type_lengths(&mut self, ty: &mut Type, span: Span, in_struct: bool) -> bool {
        match &mut ty.kind {
            TypeKind::Array(array) => {
                self.fold_array_length(&mut array.length, span, in_struct)
                    .is_some()
                    && self.fold_type_lengths(&mut array.element, span, in_struct)
            }
            _ => true,
        }
    }

    /// Record the inherited default precision on a declared type. A float
    /// left without any precision in a fragment shader is an error.
    pub(crate) fn apply_default_precision(&mut self, ty: &mut Type, span: Span, subject: Name) {
        if let TypeKind::Array(array) = &mut ty.kind {
            self.apply_default_precision(&mut array.element, span, subject);
            return;
        }
        let Some(key) = PrecisionKey::of(ty) else {
            return;
        };
        if ty.precision != Precision::None {
            return;
        }
        ty.implicit_precision = self.scopes.default_precision(key);
        if ty.implicit_precision == Precision::None && key == PrecisionKey::Float {
            let message = format!(
                "`{}` has no precision qualifier and no default precision is set for `float`",
                self.name_str(subject)
            );
            self.error(ErrorCode::E2007, span, message);
        }
    }
}
