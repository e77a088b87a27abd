//! Results of validation and linkage.

use std::fmt;
use std::io::Write;

use wgl_diagnostic::emitter::{ConsoleEmitter, ConsoleSink, DiagnosticEmitter, LogEmitter};
use wgl_diagnostic::{Diagnostic, DiagnosticQueue, SourceMap};
use wgl_validate::ShaderVariables;

use crate::FatalError;

/// Verdict on one shader.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValidationStatus {
    Failed,
    SucceededWithWarnings,
    Succeeded,
}

impl ValidationStatus {
    pub fn of(diagnostics: &DiagnosticQueue) -> Self {
        if diagnostics.has_errors() {
            ValidationStatus::Failed
        } else if diagnostics.warning_count() > 0 {
            ValidationStatus::SucceededWithWarnings
        } else {
            ValidationStatus::Succeeded
        }
    }

    #[inline]
    pub fn is_success(self) -> bool {
        self != ValidationStatus::Failed
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidationStatus::Failed => "failed",
            ValidationStatus::SucceededWithWarnings => "succeeded with warnings",
            ValidationStatus::Succeeded => "succeeded",
        })
    }
}

/// Everything one call to [`validate`](crate::validate) produced.
#[derive(Debug)]
pub struct ValidationOutcome {
    pub status: ValidationStatus,
    pub diagnostics: DiagnosticQueue,
    /// The program fragments, for resolving diagnostic spans.
    pub sources: SourceMap,
    /// Owned interface variables, when requested and validation succeeded.
    pub variables: Option<ShaderVariables>,
    /// Translated shader, when requested and validation succeeded.
    pub output: Option<String>,
}

impl ValidationOutcome {
    pub(crate) fn new(
        diagnostics: DiagnosticQueue,
        sources: SourceMap,
        variables: Option<ShaderVariables>,
        output: Option<String>,
    ) -> Self {
        ValidationOutcome {
            status: ValidationStatus::of(&diagnostics),
            diagnostics,
            sources,
            variables,
            output,
        }
    }

    #[inline]
    pub fn succeeded(&self) -> bool {
        self.status.is_success()
    }

    /// Send every diagnostic to `emitter`, followed by the summary line.
    pub fn report(&self, emitter: &mut dyn DiagnosticEmitter) -> Result<(), FatalError> {
        emitter.emit_all(self.diagnostics.as_slice(), &self.sources)?;
        emitter.emit_summary(self.diagnostics.error_count(), self.diagnostics.warning_count())?;
        emitter.flush()?;
        Ok(())
    }

    /// The plain-text validation log handed back to hosts.
    pub fn log(&self) -> String {
        let mut emitter = LogEmitter::new();
        for diagnostic in self.diagnostics.iter() {
            emitter.record(diagnostic, &self.sources);
        }
        emitter.record_summary(self.diagnostics.error_count(), self.diagnostics.warning_count());
        emitter.into_log()
    }

    /// Post every diagnostic to a host console. `url` names the shader for
    /// diagnostics without a location.
    pub fn post_to_console(&self, sink: &mut dyn ConsoleSink, url: &str) {
        let mut emitter = ConsoleEmitter::new(sink, url);
        for diagnostic in self.diagnostics.iter() {
            emitter.post(diagnostic, &self.sources);
        }
    }

    /// Write the translated shader, if there is one.
    pub fn write_output(&self, out: &mut dyn Write) -> Result<(), FatalError> {
        if let Some(output) = &self.output {
            out.write_all(output.as_bytes())?;
            out.flush()?;
        }
        Ok(())
    }
}

/// Result of checking that two stages agree on their interface.
#[derive(Clone, Debug, Default)]
pub struct LinkageOutcome {
    pub diagnostics: Vec<Diagnostic>,
}

impl LinkageOutcome {
    /// Whether the program links: no diagnostic is an error.
    pub fn linked(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wgl_diagnostic::ErrorCode;

    use super::*;

    #[test]
    fn test_status_from_diagnostics() {
        let mut diagnostics = DiagnosticQueue::new();
        assert_eq!(ValidationStatus::of(&diagnostics), ValidationStatus::Succeeded);
        diagnostics.push(Diagnostic::warning(ErrorCode::E3005).with_message("unwritten"));
        assert_eq!(
            ValidationStatus::of(&diagnostics),
            ValidationStatus::SucceededWithWarnings
        );
        diagnostics.push(Diagnostic::error(ErrorCode::E2001).with_message("no main"));
        assert_eq!(ValidationStatus::of(&diagnostics), ValidationStatus::Failed);
        assert!(!ValidationStatus::Failed.is_success());
    }

    #[test]
    fn test_linkage_verdict() {
        let mut outcome = LinkageOutcome::default();
        assert!(outcome.linked());
        outcome
            .diagnostics
            .push(Diagnostic::warning(ErrorCode::E3005).with_message("unwritten"));
        assert!(outcome.linked());
        assert_eq!(outcome.warnings().count(), 1);
        outcome
            .diagnostics
            .push(Diagnostic::error(ErrorCode::E3001).with_message("mismatch"));
        assert!(!outcome.linked());
    }
}
