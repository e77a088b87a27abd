//! Diagnostic system for shader validation.
//!
//! Every stage reports problems as [`Diagnostic`] values:
//! - an [`ErrorCode`] for searchability, grouped by stage
//! - a message saying what went wrong
//! - labelled spans saying where
//! - notes and help text
//!
//! Stages collect into a [`DiagnosticQueue`] and never stop at the first
//! error. Spans resolve to `fragment:line` through a [`SourceMap`], and an
//! [`emitter::DiagnosticEmitter`] renders them for a terminal, a log string or
//! a host console.

mod diagnostic;
pub mod emitter;
mod error_code;
mod queue;
pub mod source_map;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use queue::DiagnosticQueue;
pub use source_map::{Location, SourceMap};
