//! Failures that end a validation without a verdict.
//!
//! Problems in the shader itself are never errors here: they are
//! diagnostics in a [`ValidationOutcome`](crate::ValidationOutcome).

use std::io;

use wgl_ir::SpanError;

#[derive(Debug, thiserror::Error)]
pub enum FatalError {
    /// The program text cannot be addressed with 32-bit offsets.
    #[error("shader source too large: {0}")]
    SourceTooLarge(#[from] SpanError),

    /// Writing translated output or the compile log failed.
    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),

    /// A compiler invariant did not hold.
    #[error("internal compiler error: {0}")]
    Internal(String),
}
