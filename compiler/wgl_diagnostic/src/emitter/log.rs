//! Log Emitter
//!
//! Builds the plain-text validation log handed back to the host, one line per
//! diagnostic: `severity: fragment:line: message`.

use std::io;

use crate::{Diagnostic, SourceMap};

use super::{primary_location, DiagnosticEmitter};

#[derive(Clone, Debug, Default)]
pub struct LogEmitter {
    log: String,
}

impl LogEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log text accumulated so far.
    pub fn log(&self) -> &str {
        &self.log
    }

    pub fn into_log(self) -> String {
        self.log
    }

    /// Append one diagnostic. Appending to a string cannot fail.
    pub fn record(&mut self, diagnostic: &Diagnostic, sources: &SourceMap) {
        self.log.push_str(&diagnostic.severity.to_string());
        self.log.push_str(": ");
        if let Some(location) = primary_location(diagnostic, sources) {
            self.log.push_str(&location);
            self.log.push_str(": ");
        }
        self.log.push_str(&diagnostic.message);
        self.log.push('\n');
        for note in &diagnostic.notes {
            self.log.push_str("  note: ");
            self.log.push_str(note);
            self.log.push('\n');
        }
    }

    /// Append the `N error(s), M warning(s)` line, if anything was reported.
    pub fn record_summary(&mut self, error_count: usize, warning_count: usize) {
        if error_count > 0 || warning_count > 0 {
            self.log.push_str(&format!(
                "{error_count} error(s), {warning_count} warning(s)\n"
            ));
        }
    }
}

impl DiagnosticEmitter for LogEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic, sources: &SourceMap) -> io::Result<()> {
        self.record(diagnostic, sources);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) -> io::Result<()> {
        self.record_summary(error_count, warning_count);
        Ok(())
    }
}
