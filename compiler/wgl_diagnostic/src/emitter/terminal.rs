//! Terminal Emitter
//!
//! The compile log as a developer reads it on a terminal: one header per
//! diagnostic in `fragment:line` form, the offending source line with the
//! span underlined, then related locations and notes.
//!
//! ```text
//! shader.frag:3: error: UNKNOWN_VAR (E2005): unknown variable `colour`
//!     gl_FragColor = colour;
//!                    ^^^^^^ not declared
//!   note: declare it before use
//! ```

use std::io::{self, Write};

use wgl_ir::Span;

use crate::{Diagnostic, Label, Severity, SourceMap};

use super::DiagnosticEmitter;

/// When to color the log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color when writing to a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Whether to color output; `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Roles of colored text in the log.
#[derive(Clone, Copy)]
enum Paint {
    Severity(Severity),
    Underline,
    Location,
}

impl Paint {
    fn ansi(self) -> &'static str {
        match self {
            Paint::Severity(Severity::Error) | Paint::Underline => "\x1b[31m",
            Paint::Severity(Severity::Warning) => "\x1b[33m",
            Paint::Severity(Severity::Note | Severity::Help) => "\x1b[36m",
            Paint::Location => "\x1b[2m",
        }
    }
}

const PLAIN: &str = "\x1b[0m";

pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn paint(&mut self, paint: Paint, text: &str) -> io::Result<()> {
        if self.colors {
            write!(self.writer, "{}{text}{PLAIN}", paint.ansi())
        } else {
            self.writer.write_all(text.as_bytes())
        }
    }

    /// `fragment:line: ` for `span`, or nothing when it cannot be resolved.
    fn location(&mut self, span: Span, sources: &SourceMap) -> io::Result<()> {
        match sources.locate(span) {
            Some(loc) => self.paint(Paint::Location, &format!("{loc}: ")),
            None => Ok(()),
        }
    }

    /// The source line of a primary label with its span underlined.
    fn excerpt(&mut self, label: &Label, sources: &SourceMap) -> io::Result<()> {
        let (Some(line), Some(loc)) = (sources.line_text(label.span), sources.locate(label.span))
        else {
            return Ok(());
        };
        writeln!(self.writer, "    {line}")?;

        let indent = loc.column.saturating_sub(1) as usize;
        let width = sources
            .snippet(label.span)
            .map_or(1, |text| text.lines().next().unwrap_or("").chars().count())
            .max(1);
        let indent: String = line
            .chars()
            .take(indent)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        write!(self.writer, "    {indent}")?;
        self.paint(Paint::Underline, &"^".repeat(width))?;
        if label.message.is_empty() {
            writeln!(self.writer)
        } else {
            writeln!(self.writer, " {}", label.message)
        }
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, sources: &SourceMap) -> io::Result<()> {
        if let Some(span) = diagnostic.primary_span() {
            self.location(span, sources)?;
        }
        self.paint(
            Paint::Severity(diagnostic.severity),
            &diagnostic.severity.to_string(),
        )?;
        writeln!(
            self.writer,
            ": {} ({}): {}",
            diagnostic.code.name(),
            diagnostic.code,
            diagnostic.message
        )?;

        for label in &diagnostic.labels {
            if label.is_primary {
                self.excerpt(label, sources)?;
            } else {
                write!(self.writer, "  ")?;
                self.location(label.span, sources)?;
                writeln!(self.writer, "{}", label.message)?;
            }
        }
        for note in &diagnostic.notes {
            writeln!(self.writer, "  note: {note}")?;
        }
        for suggestion in &diagnostic.suggestions {
            writeln!(self.writer, "  help: {suggestion}")?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) -> io::Result<()> {
        let verdict = if error_count > 0 {
            "validation failed"
        } else if warning_count > 0 {
            "validation succeeded with warnings"
        } else {
            return Ok(());
        };
        writeln!(
            self.writer,
            "{verdict}: {error_count} error(s), {warning_count} warning(s)"
        )
    }
}
