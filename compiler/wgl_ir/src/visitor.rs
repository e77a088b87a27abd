//! AST visitor.
//!
//! Default `visit_*` methods delegate to free `walk_*` functions that recurse
//! into children. Override the methods you care about and call the matching
//! `walk_*` to keep descending.
//!
//! # Example
//!
//! ```text
//! struct CountCalls {
//!     count: usize,
//! }
//!
//! impl<'ast> Visitor<'ast> for CountCalls {
//!     fn visit_expr(&mut self, id: ExprId, unit: &'ast TranslationUnit) {
//!         if let ExprKind::Call { .. } = unit.expr(id).kind {
//!             self.count += 1;
//!         }
//!         walk_expr(self, id, unit);
//!     }
//! }
//! ```

use super::ast::{
    Decl, DeclKind, ExprKind, Field, FunctionProto, LayoutPair, Param, StmtKind,
    TranslationUnit, Type, TypeKind,
};
use super::{ExprId, StmtId};

pub trait Visitor<'ast> {
    fn visit_decl(&mut self, decl: &'ast Decl, unit: &'ast TranslationUnit) {
        walk_decl(self, decl, unit);
    }

    fn visit_stmt(&mut self, id: StmtId, unit: &'ast TranslationUnit) {
        walk_stmt(self, id, unit);
    }

    fn visit_expr(&mut self, id: ExprId, unit: &'ast TranslationUnit) {
        walk_expr(self, id, unit);
    }

    fn visit_type(&mut self, ty: &'ast Type, unit: &'ast TranslationUnit) {
        walk_type(self, ty, unit);
    }

    fn visit_field(&mut self, field: &'ast Field, unit: &'ast TranslationUnit) {
        self.visit_type(&field.ty, unit);
    }

    fn visit_param(&mut self, param: &'ast Param, unit: &'ast TranslationUnit) {
        self.visit_type(&param.ty, unit);
    }

    fn visit_layout(&mut self, layout: &'ast LayoutPair) {
        let _ = layout;
    }
}

/// Visit every top-level declaration in order.
pub fn walk_unit<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, unit: &'ast TranslationUnit) {
    for decl in &unit.decls {
        visitor.visit_decl(decl, unit);
    }
}

fn walk_proto<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    proto: &'ast FunctionProto,
    unit: &'ast TranslationUnit,
) {
    visitor.visit_type(&proto.return_type, unit);
    for param in &proto.params {
        visitor.visit_param(param, unit);
    }
}

pub fn walk_decl<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    decl: &'ast Decl,
    unit: &'ast TranslationUnit,
) {
    match &decl.kind {
        DeclKind::Var { ty, init, .. } => {
            visitor.visit_type(ty, unit);
            if let Some(init) = init {
                visitor.visit_expr(*init, unit);
            }
        }
        DeclKind::Array { ty, length, .. } => {
            visitor.visit_type(ty, unit);
            if let Some(expr) = length.expr {
                visitor.visit_expr(expr, unit);
            }
        }
        DeclKind::Prototype(proto) => walk_proto(visitor, proto, unit),
        DeclKind::Function { proto, body } => {
            walk_proto(visitor, proto, unit);
            visitor.visit_stmt(*body, unit);
        }
        DeclKind::TypeDecl { ty, .. } | DeclKind::Precision { ty, .. } => {
            visitor.visit_type(ty, unit);
        }
        DeclKind::Invariant { .. } => {}
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    id: StmtId,
    unit: &'ast TranslationUnit,
) {
    match &unit.stmt(id).kind {
        StmtKind::Body(stmts) => {
            for &stmt in stmts {
                visitor.visit_stmt(stmt, unit);
            }
        }
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(*cond, unit);
            visitor.visit_stmt(*then_branch, unit);
            if let Some(else_branch) = else_branch {
                visitor.visit_stmt(*else_branch, unit);
            }
        }
        StmtKind::For {
            init,
            cond,
            update,
            body,
        } => {
            visitor.visit_stmt(*init, unit);
            if let Some(cond) = cond {
                visitor.visit_expr(*cond, unit);
            }
            if let Some(update) = update {
                visitor.visit_expr(*update, unit);
            }
            visitor.visit_stmt(*body, unit);
        }
        StmtKind::While { cond, body } => {
            visitor.visit_expr(*cond, unit);
            visitor.visit_stmt(*body, unit);
        }
        StmtKind::Do { body, cond } => {
            visitor.visit_stmt(*body, unit);
            visitor.visit_expr(*cond, unit);
        }
        StmtKind::Switch { scrutinee, body } => {
            visitor.visit_expr(*scrutinee, unit);
            visitor.visit_stmt(*body, unit);
        }
        StmtKind::Case(expr) | StmtKind::Expr(expr) | StmtKind::Return(Some(expr)) => {
            visitor.visit_expr(*expr, unit);
        }
        StmtKind::Decl(decls) => {
            for decl in decls {
                visitor.visit_decl(decl, unit);
            }
        }
        StmtKind::Return(None) | StmtKind::Simple(_) => {}
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    id: ExprId,
    unit: &'ast TranslationUnit,
) {
    match &unit.expr(id).kind {
        ExprKind::Literal(_) | ExprKind::Var { .. } => {}
        ExprKind::TypeConstructor(ty) => visitor.visit_type(ty, unit),
        ExprKind::Call { callee, args } => {
            visitor.visit_expr(*callee, unit);
            for &arg in args {
                visitor.visit_expr(arg, unit);
            }
        }
        ExprKind::Binary { lhs, rhs, .. }
        | ExprKind::Assign { lhs, rhs, .. }
        | ExprKind::Sequence { lhs, rhs } => {
            visitor.visit_expr(*lhs, unit);
            visitor.visit_expr(*rhs, unit);
        }
        ExprKind::Unary { operand, .. } | ExprKind::Post { operand, .. } => {
            visitor.visit_expr(*operand, unit);
        }
        ExprKind::Conditional {
            cond,
            then_expr,
            else_expr,
        } => {
            visitor.visit_expr(*cond, unit);
            visitor.visit_expr(*then_expr, unit);
            visitor.visit_expr(*else_expr, unit);
        }
        ExprKind::Index { base, index } => {
            visitor.visit_expr(*base, unit);
            visitor.visit_expr(*index, unit);
        }
        ExprKind::Select { base, .. } => visitor.visit_expr(*base, unit),
    }
}

pub fn walk_type<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    ty: &'ast Type,
    unit: &'ast TranslationUnit,
) {
    if let Some(qualifier) = &ty.qualifier {
        for layout in &qualifier.layout {
            visitor.visit_layout(layout);
        }
    }
    match &ty.kind {
        TypeKind::Array(array) => {
            visitor.visit_type(&array.element, unit);
            if let Some(expr) = array.length.expr {
                visitor.visit_expr(expr, unit);
            }
        }
        TypeKind::Struct(s) => {
            for field in &s.fields {
                visitor.visit_field(field, unit);
            }
        }
        TypeKind::Basic(_)
        | TypeKind::Vector(_)
        | TypeKind::Matrix(_)
        | TypeKind::Sampler(_)
        | TypeKind::Name(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, ExprList, StmtKind};
    use crate::{Name, Span, StringInterner};

    #[derive(Default)]
    struct Counter {
        exprs: usize,
        stmts: usize,
        vars: Vec<Name>,
    }

    impl<'ast> Visitor<'ast> for Counter {
        fn visit_stmt(&mut self, id: StmtId, unit: &'ast TranslationUnit) {
            self.stmts += 1;
            walk_stmt(self, id, unit);
        }

        fn visit_expr(&mut self, id: ExprId, unit: &'ast TranslationUnit) {
            self.exprs += 1;
            if let ExprKind::Var { name, .. } = unit.expr(id).kind {
                self.vars.push(name);
            }
            walk_expr(self, id, unit);
        }
    }

    #[test]
    fn test_walk_reaches_nested_expressions() {
        let mut interner = StringInterner::new();
        let (a, f, main) = (interner.intern("a"), interner.intern("f"), interner.intern("main"));
        let mut unit = TranslationUnit::new();

        // f(a + 1.0);
        let var_a = unit.alloc_expr(ExprKind::var(a), Span::DUMMY);
        let one = unit.alloc_expr(ExprKind::float(1.0), Span::DUMMY);
        let sum = unit.alloc_expr(
            ExprKind::Binary {
                op: BinaryOp::Add,
                lhs: var_a,
                rhs: one,
            },
            Span::DUMMY,
        );
        let callee = unit.alloc_expr(ExprKind::var(f), Span::DUMMY);
        let mut args = ExprList::new();
        args.push(sum);
        let call = unit.alloc_expr(ExprKind::Call { callee, args }, Span::DUMMY);
        let stmt = unit.alloc_stmt(StmtKind::Expr(call), Span::DUMMY);
        let body = unit.alloc_stmt(StmtKind::Body(vec![stmt]), Span::DUMMY);
        unit.decls.push(Decl::new(
            DeclKind::Function {
                proto: FunctionProto {
                    return_type: Type::void(),
                    name: main,
                    params: Vec::new(),
                },
                body,
            },
            Span::DUMMY,
        ));

        let mut counter = Counter::default();
        walk_unit(&mut counter, &unit);
        assert_eq!(counter.stmts, 2);
        assert_eq!(counter.exprs, 5);
        assert_eq!(counter.vars, vec![f, a]);
    }
}
