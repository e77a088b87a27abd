//! Expressions, l-values, indexing and swizzles.
//!
//! Every checked expression gets its type recorded in the `ExprTypes`
//! table. A failed check reports once and returns `None`; callers skip
//! dependent checks instead of reporting follow-on errors.

use smallvec::{smallvec, SmallVec};
use wgl_diagnostic::ErrorCode;
use wgl_ir::{
    BinaryOp, ExprId, ExprKind, Intrinsic, Literal, Name, PostOp, Span, StorageQualifier, Type,
    TypeKind, UnaryOp,
};
use wgl_stack::ensure_sufficient_stack;

use super::Checker;
use crate::operators::{check_binary_operation, check_unary_operation, TypeOpError};
use crate::types::{contains_array, contains_sampler, is_int_scalar, same_type};
use crate::CLAMP_HELPER;

const SWIZZLE_SETS: [&[u8; 4]; 3] = [b"xyzw", b"rgba", b"stpq"];

/// Component indices of a swizzle such as `xy` or `bgr` on a vector of
/// `size` components.
pub(crate) fn swizzle_components(
    field: &str,
    size: u8,
) -> Result<SmallVec<[usize; 4]>, (ErrorCode, String)> {
    if field.len() > 4 {
        return Err((
            ErrorCode::E2016,
            format!("swizzle `{field}` selects more than four components"),
        ));
    }
    let mut set = None;
    let mut components = SmallVec::new();
    for c in field.bytes() {
        let found = SWIZZLE_SETS
            .iter()
            .enumerate()
            .find_map(|(which, letters)| letters.iter().position(|&l| l == c).map(|i| (which, i)));
        let Some((which, index)) = found else {
            return Err((
                ErrorCode::E2015,
                format!("unknown swizzle component `{}`", char::from(c)),
            ));
        };
        if *set.get_or_insert(which) != which {
            return Err((
                ErrorCode::E2016,
                format!("swizzle `{field}` mixes component sets"),
            ));
        }
        if index >= usize::from(size) {
            return Err((
                ErrorCode::E2016,
                format!(
                    "component `{}` is out of range for a {size}-component vector",
                    char::from(c)
                ),
            ));
        }
        components.push(index);
    }
    Ok(components)
}

impl Checker<'_> {
    /// Type-check `id` and record its type.
    pub(crate) fn check_expr(&mut self, id: ExprId) -> Option<Type> {
        let ty = ensure_sufficient_stack(|| self.check_expr_kind(id))?;
        self.types.set(id, ty.clone());
        Some(ty)
    }

    fn check_expr_kind(&mut self, id: ExprId) -> Option<Type> {
        let span = self.unit.expr(id).span;
        match self.unit.expr(id).kind.clone() {
            ExprKind::Literal(literal) => self.check_literal(&literal, span),
            ExprKind::Var { name, .. } => self.check_var(id, name, span),
            ExprKind::TypeConstructor(_) => {
                self.error(
                    ErrorCode::E2054,
                    span,
                    "a type name cannot be used as a value",
                );
                None
            }
            ExprKind::Call { callee, args } => self.check_call(callee, &args, span),
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.check_expr(lhs);
                let rhs = self.check_expr(rhs);
                let (lhs, rhs) = (lhs?, rhs?);
                let result = check_binary_operation(op, &lhs, &rhs, &*self.interner);
                self.report_operation(result, span)
            }
            ExprKind::Unary { op, operand } => {
                let ty = self.check_expr(operand)?;
                let result = check_unary_operation(op, &ty, &*self.interner);
                let result = self.report_operation(result, span)?;
                if op.is_increment() {
                    self.check_lvalue(operand, false);
                }
                Some(result)
            }
            ExprKind::Post { op, operand } => {
                let ty = self.check_expr(operand)?;
                let as_prefix = match op {
                    PostOp::Inc => UnaryOp::PreInc,
                    PostOp::Dec => UnaryOp::PreDec,
                };
                let result = check_unary_operation(as_prefix, &ty, &*self.interner);
                let result = self.report_operation(result, span)?;
                self.check_lvalue(operand, false);
                Some(result)
            }
            ExprKind::Assign { op, lhs, rhs } => self.check_assign(op, lhs, rhs, span),
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => self.check_conditional(cond, then_expr, else_expr, span),
            ExprKind::Index { base, index } => self.check_index(id, base, index, span),
            ExprKind::Select { base, field } => self.check_select(base, field, span),
            ExprKind::Sequence { lhs, rhs } => {
                let lhs = self.check_expr(lhs);
                let rhs = self.check_expr(rhs);
                lhs?;
                rhs.map(|ty| ty.unqualified())
            }
        }
    }

    fn report_operation(&mut self, result: Result<Type, TypeOpError>, span: Span) -> Option<Type> {
        match result {
            Ok(ty) => Some(ty),
            Err(error) => {
                self.error(error.code, span, error.message);
                None
            }
        }
    }

    fn check_literal(&mut self, literal: &Literal, span: Span) -> Option<Type> {
        match literal {
            Literal::Float(_) => Some(Type::float()),
            Literal::Int(_) => Some(Type::int()),
            Literal::UInt(_) => Some(Type::basic(wgl_ir::BasicType::UInt)),
            Literal::Bool(_) => Some(Type::bool()),
            Literal::Composite { ty, .. } => Some(ty.unqualified()),
            Literal::String(_) => {
                self.error(
                    ErrorCode::E2011,
                    span,
                    "string literals are not allowed in expressions",
                );
                None
            }
        }
    }

    fn check_var(&mut self, id: ExprId, name: Name, span: Span) -> Option<Type> {
        let Some(symbol) = self.scopes.lookup(name).filter(|s| !s.is_struct()) else {
            let text = self.name_str(name);
            let message = if self.functions.contains_key(&name) || Intrinsic::from_name(text).is_some() {
                format!("function `{text}` cannot be used as a value")
            } else {
                format!("unknown variable `{text}`")
            };
            self.error(ErrorCode::E2005, span, message);
            return None;
        };
        let ty = symbol.ty.clone();
        let alias = symbol.alias;
        if let Some(global) = symbol.global.and_then(|i| self.globals.get_mut(i)) {
            global.used = true;
        }
        if let Some(alias) = alias {
            self.unit.exprs[id].kind = ExprKind::var(alias);
        }
        Some(ty)
    }

    fn check_assign(
        &mut self,
        op: Option<BinaryOp>,
        lhs: ExprId,
        rhs: ExprId,
        span: Span,
    ) -> Option<Type> {
        let lhs_ty = self.check_expr(lhs);
        let rhs_ty = self.check_expr(rhs);
        let (lhs_ty, rhs_ty) = (lhs_ty?, rhs_ty?);
        if !self.check_lvalue(lhs, false) {
            return None;
        }
        if contains_sampler(&lhs_ty) || contains_array(&lhs_ty) {
            let message = format!("values of type `{}` cannot be assigned", self.describe(&lhs_ty));
            self.error(ErrorCode::E2012, span, message);
            return None;
        }
        let result = match op {
            None => rhs_ty,
            Some(op) => {
                let result = check_binary_operation(op, &lhs_ty, &rhs_ty, &*self.interner);
                self.report_operation(result, span)?
            }
        };
        if !same_type(&lhs_ty, &result) {
            let message = format!(
                "cannot assign a value of type `{}` to `{}`",
                self.describe(&result),
                self.describe(&lhs_ty)
            );
            self.error(ErrorCode::E2010, span, message);
            return None;
        }
        Some(lhs_ty.unqualified())
    }

    fn check_conditional(
        &mut self,
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
        span: Span,
    ) -> Option<Type> {
        let cond_ty = self.check_expr(cond);
        let then_ty = self.check_expr(then_expr);
        let else_ty = self.check_expr(else_expr);
        if let Some(cond_ty) = cond_ty.filter(|ty| !ty.is_bool_scalar()) {
            let message = format!(
                "condition of `?:` must be a `bool`, found `{}`",
                self.describe(&cond_ty)
            );
            self.error(ErrorCode::E2013, span, message);
        }
        let (then_ty, else_ty) = (then_ty?, else_ty?);
        if !same_type(&then_ty, &else_ty) {
            let message = format!(
                "branches of `?:` have different types `{}` and `{}`",
                self.describe(&then_ty),
                self.describe(&else_ty)
            );
            self.error(ErrorCode::E2014, span, message);
            return None;
        }
        if then_ty.is_array() {
            self.error(ErrorCode::E2012, span, "`?:` cannot select between arrays");
            return None;
        }
        Some(then_ty.unqualified())
    }

    fn check_index(&mut self, id: ExprId, base: ExprId, index: ExprId, span: Span) -> Option<Type> {
        let base_ty = self.check_expr(base);
        let index_ty = self.check_expr(index);
        let (base_ty, index_ty) = (base_ty?, index_ty?);
        if !is_int_scalar(&index_ty) {
            let message = format!("index must be an `int`, found `{}`", self.describe(&index_ty));
            self.error(ErrorCode::E2057, self.unit.expr(index).span, message);
            return None;
        }

        let (bound, element, code) = match &base_ty.kind {
            TypeKind::Array(array) => (array.length.value, array.element.unqualified(), ErrorCode::E2026),
            TypeKind::Vector(v) => (
                Some(u32::from(v.size)),
                Type::basic(v.element),
                ErrorCode::E2027,
            ),
            TypeKind::Matrix(m) => (
                Some(u32::from(m.columns)),
                Type::new(TypeKind::Vector(m.column_type())),
                ErrorCode::E2027,
            ),
            _ => {
                let message = format!("`{}` cannot be indexed", self.describe(&base_ty));
                self.error(ErrorCode::E2057, span, message);
                return None;
            }
        };

        if self.is_constant(index, false) {
            let value = self.eval_const(index).and_then(|v| v.as_int());
            if let (Some(bound), Some(value)) = (bound, value) {
                if !u32::try_from(value).is_ok_and(|v| v < bound) {
                    let message = format!(
                        "index {value} is out of range for `{}`",
                        self.describe(&base_ty)
                    );
                    self.error(code, span, message);
                    return None;
                }
            }
        } else if self.root_storage(base) == Some(StorageQualifier::Uniform) {
            if !self.is_vertex()
                && self.options.fragment_constant_uniform_indexing
                && !self.is_constant(index, true)
            {
                self.error(
                    ErrorCode::E2028,
                    span,
                    "uniforms in fragment shaders can only be indexed by constant expressions or loop indices",
                );
                return None;
            }
            if self.options.clamp_uniform_array_indexing {
                if let Some(bound) = bound {
                    self.clamp_index(id, base, index, bound);
                }
            }
        }
        Some(element)
    }

    /// Storage qualifier of the variable at the root of an access chain.
    fn root_storage(&self, mut id: ExprId) -> Option<StorageQualifier> {
        loop {
            match &self.unit.expr(id).kind {
                ExprKind::Index { base, .. } | ExprKind::Select { base, .. } => id = *base,
                ExprKind::Var { .. } => return self.types.get(id).map(Type::storage),
                _ => return None,
            }
        }
    }

    /// Rewrite `base[index]` into `base[webgl_op_clamp(index, bound - 1)]`.
    fn clamp_index(&mut self, id: ExprId, base: ExprId, index: ExprId, bound: u32) {
        let Some(max) = bound.checked_sub(1).and_then(|m| i32::try_from(m).ok()) else {
            return;
        };
        let span = self.unit.expr(index).span;
        let helper = self.interner.intern(CLAMP_HELPER);
        let callee = self.unit.alloc_expr(ExprKind::var(helper), span);
        let limit = self.unit.alloc_expr(ExprKind::int(max), span);
        let call = self.unit.alloc_expr(
            ExprKind::Call {
                callee,
                args: smallvec![index, limit],
            },
            span,
        );
        self.types.set(limit, Type::int());
        self.types.set(call, Type::int());
        self.unit.exprs[id].kind = ExprKind::Index { base, index: call };
        self.used_clamp = true;
    }

    fn check_select(&mut self, base: ExprId, field: Name, span: Span) -> Option<Type> {
        let base_ty = self.check_expr(base)?;
        match &base_ty.kind {
            TypeKind::Vector(v) => match swizzle_components(self.name_str(field), v.size) {
                Ok(components) => match u8::try_from(components.len()) {
                    Ok(1) => Some(Type::basic(v.element)),
                    Ok(n) => Some(Type::vector(v.element, n)),
                    Err(_) => None,
                },
                Err((code, message)) => {
                    self.error(code, span, message);
                    None
                }
            },
            TypeKind::Struct(s) => {
                if let Some(f) = s.field(field) {
                    return Some(f.ty.clone());
                }
                let message = format!(
                    "`{}` has no field named `{}`",
                    self.describe(&base_ty),
                    self.name_str(field)
                );
                self.error(ErrorCode::E2017, span, message);
                None
            }
            _ => {
                let message = format!(
                    "`{}` has no fields or components",
                    self.describe(&base_ty)
                );
                self.error(ErrorCode::E2058, span, message);
                None
            }
        }
    }

    /// Check that `id` can be written, and mark written interface
    /// variables. `reference` selects the error for `out` and `inout`
    /// arguments.
    pub(crate) fn check_lvalue(&mut self, id: ExprId, reference: bool) -> bool {
        let span = self.unit.expr(id).span;
        let code = |default| if reference { ErrorCode::E2023 } else { default };
        match self.unit.expr(id).kind.clone() {
            ExprKind::Var { name, .. } => {
                let Some(symbol) = self.scopes.lookup(name) else {
                    return false;
                };
                let storage = symbol.ty.storage();
                let reason = if symbol.loop_index {
                    Some("loop index")
                } else if symbol.is_const || storage == StorageQualifier::Const {
                    Some("constant")
                } else if symbol.read_only {
                    Some("read-only variable")
                } else {
                    match storage {
                        StorageQualifier::Uniform => Some("uniform"),
                        StorageQualifier::Attribute => Some("attribute"),
                        _ => None,
                    }
                };
                let global = symbol.global;
                if let Some(reason) = reason {
                    let message = format!("cannot assign to {reason} `{}`", self.name_str(name));
                    self.error(code(ErrorCode::E2018), span, message);
                    return false;
                }
                if storage == StorageQualifier::Varying && !self.is_vertex() {
                    let message = format!(
                        "varying `{}` is read-only in fragment shaders",
                        self.name_str(name)
                    );
                    self.error(code(ErrorCode::E2019), span, message);
                    return false;
                }
                if let Some(global) = global.and_then(|i| self.globals.get_mut(i)) {
                    global.written = true;
                }
                true
            }
            ExprKind::Index { base, .. } => self.check_lvalue(base, reference),
            ExprKind::Select { base, field } => {
                if let Some(v) = self.types.get(base).and_then(Type::as_vector) {
                    let repeated = swizzle_components(self.name_str(field), v.size)
                        .is_ok_and(|c| c.iter().enumerate().any(|(i, x)| c[..i].contains(x)));
                    if repeated {
                        let message = format!(
                            "swizzle `{}` repeats a component and cannot be assigned",
                            self.name_str(field)
                        );
                        self.error(code(ErrorCode::E2052), span, message);
                        return false;
                    }
                }
                self.check_lvalue(base, reference)
            }
            _ => {
                self.error(code(ErrorCode::E2052), span, "expression cannot be assigned to");
                false
            }
        }
    }
}
