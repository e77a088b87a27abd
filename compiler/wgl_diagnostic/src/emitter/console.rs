//! Console Emitter
//!
//! Forwards diagnostics to a host developer console. The host implements
//! [`ConsoleSink`]; messages are tagged so the console can group shader
//! validation output.

use std::io;

use crate::{Diagnostic, Severity, SourceMap};

use super::DiagnosticEmitter;

/// Context tag for errors.
pub const CONSOLE_CONTEXT: &str = "WebGL shader validation";

/// Context tag for warnings.
pub const CONSOLE_WARNING_CONTEXT: &str = "WebGL shader validation warning";

/// One message as posted to the host console.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleMessage {
    pub context: &'static str,
    pub url: String,
    /// 1-based line, 0 when unknown.
    pub line: u32,
    pub text: String,
    pub severity: Severity,
}

/// Host console receiving validation messages.
pub trait ConsoleSink {
    fn post(&mut self, message: ConsoleMessage);
}

impl ConsoleSink for Vec<ConsoleMessage> {
    fn post(&mut self, message: ConsoleMessage) {
        self.push(message);
    }
}

pub struct ConsoleEmitter<'a, S: ConsoleSink + ?Sized> {
    sink: &'a mut S,
    url: String,
}

impl<'a, S: ConsoleSink + ?Sized> ConsoleEmitter<'a, S> {
    /// `url` names the shader when a span cannot be resolved.
    pub fn new(sink: &'a mut S, url: impl Into<String>) -> Self {
        ConsoleEmitter {
            sink,
            url: url.into(),
        }
    }
}

impl<S: ConsoleSink + ?Sized> ConsoleEmitter<'_, S> {
    /// Post one diagnostic to the sink.
    pub fn post(&mut self, diagnostic: &Diagnostic, sources: &SourceMap) {
        let location = diagnostic.primary_span().and_then(|s| sources.locate(s));
        let (url, line) = match location {
            Some(loc) => (loc.fragment.to_owned(), loc.line),
            None => (self.url.clone(), 0),
        };
        let context = if diagnostic.is_warning() {
            CONSOLE_WARNING_CONTEXT
        } else {
            CONSOLE_CONTEXT
        };
        self.sink.post(ConsoleMessage {
            context,
            url,
            line,
            text: format!("{}: {}", diagnostic.code.name(), diagnostic.message),
            severity: diagnostic.severity,
        });
    }
}

impl<S: ConsoleSink + ?Sized> DiagnosticEmitter for ConsoleEmitter<'_, S> {
    fn emit(&mut self, diagnostic: &Diagnostic, sources: &SourceMap) -> io::Result<()> {
        self.post(diagnostic, sources);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// The console has no summary line.
    fn emit_summary(&mut self, _error_count: usize, _warning_count: usize) -> io::Result<()> {
        Ok(())
    }
}
