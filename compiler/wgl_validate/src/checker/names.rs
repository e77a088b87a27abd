//! Identifier rules and HLSL aliasing.
//!
//! HLSL reserves many words that GLSL leaves free (`line`, `half`,
//! `sampler`, ...). For HLSL targets such identifiers are renamed in place:
//! the declaration and every reference get the alias, and the symbol is
//! bound under both names.

use wgl_diagnostic::{Diagnostic, ErrorCode};
use wgl_ir::{djb_hash, Name, Span};

use super::Checker;
use crate::hlsl_keywords::is_hlsl_reserved;
use crate::scope::Symbol;

/// Longest identifier accepted.
const MAX_IDENTIFIER_LEN: usize = 256;

/// Which alias scheme a name gets.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum AliasKind {
    /// Uniforms and varyings. The alias is a hash of the name, so separately
    /// compiled stages agree on it.
    Interface,
    /// Everything else: a counter.
    Local,
}

impl Checker<'_> {
    /// Check a name introduced by a declaration. Returns `false` when the
    /// name was rejected.
    pub(crate) fn check_declared_name(&mut self, name: Name, span: Span) -> bool {
        let text = self.name_str(name);
        let problem = if text.starts_with("gl_") {
            Some((
                ErrorCode::E2002,
                format!("`{text}` uses the reserved prefix `gl_`"),
            ))
        } else if text.starts_with("webgl_") || text.starts_with("_webgl_") {
            Some((
                ErrorCode::E2002,
                format!("`{text}` uses a prefix reserved by the compiler"),
            ))
        } else if text.len() > MAX_IDENTIFIER_LEN {
            Some((
                ErrorCode::E2003,
                format!(
                    "identifier is {} characters long, the limit is {MAX_IDENTIFIER_LEN}",
                    text.len()
                ),
            ))
        } else {
            None
        };
        match problem {
            Some((code, message)) => {
                self.error(code, span, message);
                false
            }
            None => true,
        }
    }

    /// The alias for `name`, when the target needs one.
    pub(crate) fn alias_for(&mut self, name: Name, kind: AliasKind) -> Option<Name> {
        if !self.options.output_format.is_hlsl() || !is_hlsl_reserved(self.name_str(name)) {
            return None;
        }
        let alias = match kind {
            AliasKind::Interface => format!("webgl_h{}", djb_hash(self.name_str(name))),
            AliasKind::Local => {
                let n = self.next_alias;
                self.next_alias += 1;
                format!("webgl_{n}")
            }
        };
        tracing::trace!(name = self.name_str(name), alias = %alias, "aliased");
        Some(self.interner.intern_owned(alias))
    }

    /// Bind `name` in the innermost scope, and its alias when it has one.
    /// Reports `DUPLICATE_NAME` and returns `false` on a clash.
    pub(crate) fn bind(&mut self, name: Name, symbol: Symbol) -> bool {
        let span = symbol.span;
        let alias = symbol.alias;
        let shadow = alias.map(|_| symbol.clone());
        match self.scopes.insert(name, symbol) {
            Ok(()) => {
                if let (Some(alias), Some(shadow)) = (alias, shadow) {
                    let _ = self.scopes.insert(alias, shadow);
                }
                true
            }
            Err(previous) => {
                self.report_duplicate(name, span, previous);
                false
            }
        }
    }

    #[cold]
    pub(crate) fn report_duplicate(&mut self, name: Name, span: Span, previous: Span) {
        let mut diagnostic = Diagnostic::error(ErrorCode::E2004)
            .with_message(format!(
                "`{}` is already declared in this scope",
                self.name_str(name)
            ))
            .with_label(span, ErrorCode::E2004.name());
        if previous != Span::DUMMY {
            diagnostic = diagnostic.with_secondary_label(previous, "previously declared here");
        }
        self.diagnostics.push(diagnostic);
    }
}
