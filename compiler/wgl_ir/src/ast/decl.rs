//! Declarations.
//!
//! A declaration statement with several declarators (`float a, b = 1.0;`) is
//! split into one [`Decl`] per declarator, each carrying a full copy of the
//! type. Printers regroup them only where the grammar requires it.

use super::{ArrayLength, Precision, Type};
use crate::{ExprId, Name, Span, StmtId};

#[derive(Clone, PartialEq, Debug)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: Span,
}

impl Decl {
    pub fn new(kind: DeclKind, span: Span) -> Self {
        Decl { kind, span }
    }

    /// The name this declaration introduces, if any.
    pub fn declared_name(&self) -> Option<Name> {
        match &self.kind {
            DeclKind::Var { name, .. } | DeclKind::Array { name, .. } => Some(*name),
            DeclKind::Prototype(proto) | DeclKind::Function { proto, .. } => Some(proto.name),
            DeclKind::TypeDecl { var_name, .. } => *var_name,
            DeclKind::Precision { .. } | DeclKind::Invariant { .. } => None,
        }
    }
}

/// A formal parameter. Direction lives in the type's storage qualifier.
#[derive(Clone, PartialEq, Debug)]
pub struct Param {
    pub ty: Type,
    pub name: Option<Name>,
    pub span: Span,
}

#[derive(Clone, PartialEq, Debug)]
pub struct FunctionProto {
    pub return_type: Type,
    pub name: Name,
    pub params: Vec<Param>,
}

#[derive(Clone, PartialEq, Debug)]
pub enum DeclKind {
    Var {
        ty: Type,
        name: Name,
        init: Option<ExprId>,
    },
    /// `ty name[length];`; `ty` is the element type.
    Array {
        ty: Type,
        name: Name,
        length: ArrayLength,
    },
    Prototype(FunctionProto),
    Function {
        proto: FunctionProto,
        /// Always a `Body`.
        body: StmtId,
    },
    /// A struct definition, optionally declaring one variable of it.
    TypeDecl {
        ty: Type,
        var_name: Option<Name>,
    },
    /// `precision mediump float;`
    Precision {
        precision: Precision,
        ty: Type,
    },
    /// `invariant a, b;`
    Invariant {
        names: Vec<(Name, Span)>,
    },
}
