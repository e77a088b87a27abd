//! Pre-pass over the validated AST.
//!
//! Before printing anything the generator needs to know which builtin
//! variables the shader touches (they shape the input and output structs)
//! and which helper functions it calls (they are printed before the
//! shader body).

use bitflags::bitflags;
use wgl_ir::visitor::{walk_expr, walk_unit};
use wgl_ir::{ExprId, ExprKind, ExprTypes, Literal, StringInterner, TranslationUnit, Visitor};
use wgl_stack::ensure_sufficient_stack;

use crate::helpers::Helpers;
use crate::rewrite::{call_form, constructor_form, ConstructorForm};

bitflags! {
    /// Builtin variables referenced by the shader.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Builtins: u32 {
        // === Vertex outputs ===

        const POSITION = 1 << 0;
        const POINT_SIZE = 1 << 1;

        // === Fragment inputs ===

        const FRAG_COORD = 1 << 2;
        const POINT_COORD = 1 << 3;
        const FRONT_FACING = 1 << 4;

        // === Fragment outputs ===

        const FRAG_COLOR = 1 << 5;
        const FRAG_DATA = 1 << 6;

        // === Uniform state ===

        const DEPTH_RANGE = 1 << 7;
    }
}

impl Builtins {
    /// The flag for builtin variable `name`, empty for anything else.
    pub fn for_variable(name: &str) -> Builtins {
        match name {
            "gl_Position" => Builtins::POSITION,
            "gl_PointSize" => Builtins::POINT_SIZE,
            "gl_FragCoord" => Builtins::FRAG_COORD,
            "gl_PointCoord" => Builtins::POINT_COORD,
            "gl_FrontFacing" => Builtins::FRONT_FACING,
            "gl_FragColor" => Builtins::FRAG_COLOR,
            "gl_FragData" => Builtins::FRAG_DATA,
            "gl_DepthRange" => Builtins::DEPTH_RANGE,
            _ => Builtins::empty(),
        }
    }
}

/// What the shader uses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Usage {
    pub helpers: Helpers,
    pub builtins: Builtins,
    /// `gl_FragData` elements written, ascending.
    pub frag_data_slots: Vec<u32>,
}

impl Usage {
    pub fn collect(unit: &TranslationUnit, interner: &StringInterner, types: &ExprTypes) -> Usage {
        let mut finder = UsageFinder {
            interner,
            types,
            usage: Usage::default(),
        };
        walk_unit(&mut finder, unit);
        let mut usage = finder.usage;
        usage.frag_data_slots.sort_unstable();
        usage.frag_data_slots.dedup();
        tracing::debug!(
            helpers = usage.helpers.bits().count_ones(),
            builtins = ?usage.builtins,
            "collected shader usage"
        );
        usage
    }
}

struct UsageFinder<'a> {
    interner: &'a StringInterner,
    types: &'a ExprTypes,
    usage: Usage,
}

impl<'ast> Visitor<'ast> for UsageFinder<'_> {
    fn visit_expr(&mut self, id: ExprId, unit: &'ast TranslationUnit) {
        ensure_sufficient_stack(|| {
            match &unit.expr(id).kind {
                ExprKind::Var { name, .. } => {
                    self.usage.builtins |= Builtins::for_variable(self.interner.lookup(*name));
                }
                ExprKind::Call { callee, args } => match &unit.expr(*callee).kind {
                    ExprKind::Var {
                        intrinsic: Some(intrinsic),
                        ..
                    } => {
                        if let Some(helper) = call_form(*intrinsic, args, self.types).helper() {
                            self.usage.helpers |= helper;
                        }
                    }
                    ExprKind::TypeConstructor(ty) => {
                        let target = self.types.get(*callee).unwrap_or(ty.as_ref());
                        if let ConstructorForm::MatrixUpsize(helper) =
                            constructor_form(target, args, self.types)
                        {
                            self.usage.helpers |= helper;
                        }
                    }
                    _ => {}
                },
                ExprKind::Index { base, index } => {
                    if is_frag_data(unit, self.interner, *base) {
                        self.usage.frag_data_slots.push(frag_data_slot(unit, *index));
                    }
                }
                _ => {}
            }
            walk_expr(self, id, unit);
        });
    }
}

/// Whether `id` is a reference to `gl_FragData`.
pub fn is_frag_data(unit: &TranslationUnit, interner: &StringInterner, id: ExprId) -> bool {
    matches!(unit.expr(id).kind, ExprKind::Var { name, .. } if interner.lookup(name) == "gl_FragData")
}

/// The element a `gl_FragData` index selects. Only constant indices are
/// resolved; anything else writes the first render target.
pub fn frag_data_slot(unit: &TranslationUnit, index: ExprId) -> u32 {
    match unit.expr(index).kind {
        ExprKind::Literal(Literal::Int(value)) => u32::try_from(value).unwrap_or(0),
        ExprKind::Literal(Literal::UInt(value)) => value,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_builtin_flags() {
        assert_eq!(Builtins::for_variable("gl_FragData"), Builtins::FRAG_DATA);
        assert_eq!(Builtins::for_variable("gl_DepthRange"), Builtins::DEPTH_RANGE);
        assert!(Builtins::for_variable("position").is_empty());
    }

    #[test]
    fn test_frag_data_slot() {
        let mut unit = TranslationUnit::new();
        let literal = unit.alloc_expr(ExprKind::int(0), wgl_ir::Span::DUMMY);
        let negative = unit.alloc_expr(ExprKind::int(-3), wgl_ir::Span::DUMMY);
        assert_eq!(frag_data_slot(&unit, literal), 0);
        assert_eq!(frag_data_slot(&unit, negative), 0);
    }
}
