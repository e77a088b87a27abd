use std::io;

use pretty_assertions::assert_eq;
use wgl_ir::Span;

use super::*;
use crate::{ErrorCode, Severity};

fn sources() -> SourceMap {
    SourceMap::single("shader.frag", "void main()\n{\n    gl_FragColor = colour;\n}\n")
        .unwrap_or_default()
}

fn unknown_var() -> Diagnostic {
    Diagnostic::error(ErrorCode::E2005)
        .with_message("unknown variable `colour`")
        .with_label(Span::new(33, 39), "not declared")
        .with_note("declare it before use")
}

fn terminal_text(emit: impl FnOnce(&mut TerminalEmitter<Vec<u8>>) -> io::Result<()>) -> String {
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    assert!(emit(&mut emitter).is_ok());
    String::from_utf8(emitter.into_inner()).unwrap_or_default()
}

#[test]
fn test_terminal_emitter_excerpt() {
    let text = terminal_text(|emitter| {
        emitter.emit(&unknown_var(), &sources())?;
        emitter.emit_summary(1, 0)?;
        emitter.flush()
    });
    let underline = " ".repeat(4 + 19);
    assert_eq!(
        text,
        format!(
            "shader.frag:3: error: UNKNOWN_VAR (E2005): unknown variable `colour`\n        \
             gl_FragColor = colour;\n{underline}^^^^^^ not declared\n  note: declare it before use\n\
             validation failed: 1 error(s), 0 warning(s)\n"
        )
    );
}

#[test]
fn test_terminal_emitter_related_locations_and_help() {
    let diagnostic = Diagnostic::error(ErrorCode::E2004)
        .with_message("duplicate name `main`")
        .with_label(Span::new(14, 18), "")
        .with_secondary_label(Span::new(5, 9), "previously declared here")
        .with_suggestion("rename one of them");
    let text = terminal_text(|emitter| emitter.emit(&diagnostic, &sources()));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[2], format!("    {}", "^".repeat(4)));
    assert_eq!(lines[3], "  shader.frag:1: previously declared here");
    assert_eq!(lines[4], "  help: rename one of them");
}

#[test]
fn test_terminal_emitter_without_location() {
    let diagnostic = Diagnostic::error(ErrorCode::E2001).with_message("missing main");
    let text = terminal_text(|emitter| emitter.emit(&diagnostic, &sources()));
    assert_eq!(text, "error: MISSING_MAIN_FUNCTION (E2001): missing main\n");
}

#[test]
fn test_terminal_emitter_with_color() {
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Auto, true);
    assert!(emitter.emit(&unknown_var(), &sources()).is_ok());
    let text = String::from_utf8(emitter.into_inner()).unwrap_or_default();
    assert!(text.contains("\x1b[31merror\x1b[0m"), "{text:?}");
    assert!(text.contains("\x1b[31m^^^^^^\x1b[0m"), "{text:?}");
}

#[test]
fn test_terminal_summary() {
    let text = terminal_text(|emitter| {
        emitter.emit_summary(0, 0)?;
        emitter.emit_summary(0, 2)?;
        emitter.emit_summary(3, 1)
    });
    assert_eq!(
        text,
        "validation succeeded with warnings: 0 error(s), 2 warning(s)\n\
         validation failed: 3 error(s), 1 warning(s)\n"
    );
}

struct ClosedPipe;

impl io::Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_terminal_write_failures_are_returned() {
    let mut emitter = TerminalEmitter::with_color_mode(ClosedPipe, ColorMode::Never, false);
    let result = emitter.emit(&unknown_var(), &sources());
    assert_eq!(result.map_err(|e| e.kind()), Err(io::ErrorKind::BrokenPipe));
    let result = emitter.emit_summary(1, 0);
    assert_eq!(result.map_err(|e| e.kind()), Err(io::ErrorKind::BrokenPipe));
}

#[test]
fn test_log_emitter() {
    let mut emitter = LogEmitter::new();
    let result = emitter.emit_all(
        &[
            unknown_var(),
            Diagnostic::warning(ErrorCode::E0016).with_message("extension not supported"),
        ],
        &sources(),
    );
    assert!(result.is_ok());
    assert_eq!(
        emitter.log(),
        "error: shader.frag:3: unknown variable `colour`\n  note: declare it before use\nwarning: extension not supported\n"
    );
}

#[test]
fn test_console_emitter_tags() {
    let mut messages: Vec<ConsoleMessage> = Vec::new();
    {
        let mut emitter = ConsoleEmitter::new(&mut messages, "shader.frag");
        emitter.post(&unknown_var(), &sources());
        emitter.post(
            &Diagnostic::warning(ErrorCode::E3005).with_message("varying never written"),
            &sources(),
        );
    }
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].context, CONSOLE_CONTEXT);
    assert_eq!(messages[0].line, 3);
    assert_eq!(messages[0].text, "UNKNOWN_VAR: unknown variable `colour`");
    assert_eq!(messages[1].context, CONSOLE_WARNING_CONTEXT);
    assert_eq!(messages[1].severity, Severity::Warning);
    assert_eq!(messages[1].line, 0);
}
