//! Grammar productions.
//!
//! Each module extends `Parser` with methods for one part of the grammar:
//!
//! - [`decl`]: declarations, function prototypes and definitions
//! - [`expr`]: expressions, from `,` down to primaries
//! - [`operators`]: token to operator mapping and reserved operators
//! - [`stmt`]: statements and compound statements
//! - [`ty`]: qualifiers, type specifiers, struct specifiers

mod decl;
mod expr;
mod operators;
mod stmt;
mod ty;
