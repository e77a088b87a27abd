//! Diagnostic emitters.
//!
//! - [`TerminalEmitter`]: the compile log with source excerpts, optionally colored
//! - [`LogEmitter`]: accumulates the validation log string returned to hosts
//! - [`ConsoleEmitter`]: forwards to a host developer console
//!
//! Emitters resolve spans through the compilation's [`SourceMap`].

mod console;
mod log;
mod terminal;

pub use console::{ConsoleEmitter, ConsoleMessage, ConsoleSink, CONSOLE_CONTEXT, CONSOLE_WARNING_CONTEXT};
pub use log::LogEmitter;
pub use terminal::{ColorMode, TerminalEmitter};

use std::io;

use crate::{Diagnostic, SourceMap};

/// A destination for rendered diagnostics.
///
/// Write failures of the underlying sink are returned, never swallowed.
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic, sources: &SourceMap) -> io::Result<()>;

    fn emit_all(&mut self, diagnostics: &[Diagnostic], sources: &SourceMap) -> io::Result<()> {
        for diag in diagnostics {
            self.emit(diag, sources)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()>;

    /// Closing line of the log, given the totals.
    fn emit_summary(&mut self, error_count: usize, warning_count: usize) -> io::Result<()>;
}

/// `fragment:line` for a diagnostic's primary span, if it has one.
pub(crate) fn primary_location(diagnostic: &Diagnostic, sources: &SourceMap) -> Option<String> {
    let span = diagnostic.primary_span()?;
    sources.locate(span).map(|loc| loc.to_string())
}

#[cfg(test)]
mod tests;
