//! WGLC
//!
//! Entry points of the WebGL shader compiler.
//!
//! # Architecture
//!
//! ```text
//! source fragments
//!     │
//!     ▼
//! wgl_lexer::lex ──► tokens             (lexical errors stop here)
//!     │
//!     ▼
//! wgl_parse::parse ──► TranslationUnit  (syntax errors stop here)
//!     │
//!     ▼
//! wgl_validate::validate ──► types, ShaderVariables
//!     │
//!     ├──► wgl_fmt    GLSL ES / GLSL text
//!     └──► wgl_hlsl   Cg/HLSL text
//! ```
//!
//! Each call owns its interner and AST; only the [`ValidationOutcome`]
//! survives it.

mod config;
mod error;
mod outcome;
mod pipeline;

pub use config::Configuration;
pub use error::FatalError;
pub use outcome::{LinkageOutcome, ValidationOutcome, ValidationStatus};
pub use pipeline::{
    validate, validate_linkage, validate_program, validate_program_with_console, ProgramText,
};

pub use wgl_diagnostic::emitter::{
    ColorMode, ConsoleEmitter, ConsoleMessage, ConsoleSink, DiagnosticEmitter, LogEmitter,
    TerminalEmitter,
};
pub use wgl_diagnostic::{Diagnostic, ErrorCode, Severity};
pub use wgl_hlsl::{Semantic, SemanticInfo};
pub use wgl_ir::{OutputFormat, ShaderStage};
pub use wgl_validate::{ShaderVariable, ShaderVariables, VarType, VariableKind};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber for debug output.
///
/// Does nothing unless `RUST_LOG` is set, e.g. `RUST_LOG=wgl_validate=debug`.
/// Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
