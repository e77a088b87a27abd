//! Arena-allocated GLSL AST.
//!
//! Expressions and statements live in [`TranslationUnit`] arenas and refer to
//! each other by [`ExprId`] / [`StmtId`]. Declarations are owned inline, since
//! they are never shared and rarely rewritten.

mod decl;
mod expr;
mod intrinsic;
mod operators;
mod stmt;
mod types;

pub use decl::{Decl, DeclKind, FunctionProto, Param};
pub use expr::{Expr, ExprKind, ExprList, Literal};
pub use intrinsic::Intrinsic;
pub use operators::{Assoc, BinaryOp, PostOp, PrecAssoc, Precedence, UnaryOp};
pub use stmt::{SimpleStmt, Stmt, StmtKind};
pub use types::{
    ArrayLength, ArrayType, BasicType, Field, LayoutPair, MatrixType, Precision, SamplerFlavour,
    SamplerKind, SamplerType, StorageQualifier, StructType, Type, TypeKeyword, TypeKind,
    TypeQualifier, VectorType,
};

use crate::arena::Arena;
use crate::{ExprId, Span, StmtId};

pub type ExprArena = Arena<ExprId, Expr>;
pub type StmtArena = Arena<StmtId, Stmt>;

/// A parsed shader: node arenas plus the top-level declarations in order.
#[derive(Clone, Debug, Default)]
pub struct TranslationUnit {
    pub exprs: ExprArena,
    pub stmts: StmtArena,
    pub decls: Vec<Decl>,
}

impl TranslationUnit {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.exprs.alloc(Expr::new(kind, span))
    }

    #[inline]
    pub fn alloc_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        self.stmts.alloc(Stmt::new(kind, span))
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id]
    }

    /// The function definition called `name`, if present.
    pub fn find_function(&self, name: crate::Name) -> Option<(&FunctionProto, StmtId)> {
        self.decls.iter().find_map(|decl| match &decl.kind {
            DeclKind::Function { proto, body } if proto.name == name => Some((proto, *body)),
            _ => None,
        })
    }
}

/// Static expression types, filled in by the validator.
#[derive(Clone, Debug, Default)]
pub struct ExprTypes {
    types: Vec<Option<Type>>,
}

impl ExprTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: ExprId, ty: Type) {
        let index = id.index();
        if index >= self.types.len() {
            self.types.resize(index + 1, None);
        }
        self.types[index] = Some(ty);
    }

    #[inline]
    pub fn get(&self, id: ExprId) -> Option<&Type> {
        self.types.get(id.index()).and_then(Option::as_ref)
    }
}

#[cfg(test)]
mod tests;
