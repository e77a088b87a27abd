//! WGL IR - shared data structures for the WebGL shader compiler.
//!
//! - Spans for source locations
//! - Names for interned identifiers, owned by a per-compilation interner
//! - Tokens and `TokenList` for lexer output
//! - The arena AST: types, expressions, statements and declarations
//! - A visitor over the AST
//! - Output format and shader stage shared by the backends
//!
//! # Design
//!
//! - **Intern names**: identifiers are `Name(u32)` handles.
//! - **Flatten nodes**: expressions and statements are `ExprId` / `StmtId`
//!   indices into arenas, never `Box`.
//! - **Closed variants**: every node kind is an enum matched exhaustively.

mod arena;
pub mod ast;
mod ids;
mod interner;
mod name;
mod span;
mod target;
mod token;
pub mod visitor;

pub use arena::{Arena, ArenaId};
pub use ast::{
    ArrayLength, ArrayType, Assoc, BasicType, BinaryOp, Decl, DeclKind, Expr, ExprArena, ExprKind,
    ExprList, ExprTypes, Field, FunctionProto, Intrinsic, LayoutPair, Literal, MatrixType, Param,
    PostOp, PrecAssoc, Precedence, Precision, SamplerFlavour, SamplerKind, SamplerType,
    SimpleStmt, Stmt, StmtArena, StmtKind, StorageQualifier, StructType, TranslationUnit, Type,
    TypeKeyword, TypeKind, TypeQualifier, UnaryOp, VectorType,
};
pub use ids::{ExprId, StmtId};
pub use interner::{djb_hash, StringInterner};
pub use name::Name;
pub use span::{Span, SpanError};
pub use target::{OutputFormat, ShaderStage};
pub use token::{Token, TokenKind, TokenList};
pub use visitor::Visitor;
