//! Stack growth for the recursive passes.
//!
//! Shader sources are untrusted input. A fragment such as `((((...))))` or a
//! long chain of unary minus signs drives the parser, the validator and both
//! printers into deep recursion, so every recursive entry point wraps its body
//! in [`ensure_sufficient_stack`].
//!
//! On native targets the `stacker` crate grows the stack on demand. On WASM the
//! closure is called directly.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 64 * 1024;

/// Size of each freshly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if the remaining space is below the red zone.
///
/// ```text
/// fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
///     ensure_sufficient_stack(|| self.parse_unary_inner())
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::ensure_sufficient_stack;

    fn nest(depth: u32) -> u32 {
        ensure_sufficient_stack(|| if depth == 0 { 0 } else { nest(depth - 1) + 1 })
    }

    #[test]
    fn passes_result_through() {
        assert_eq!(ensure_sufficient_stack(|| 7), 7);
    }

    #[test]
    fn deep_recursion_does_not_overflow() {
        assert_eq!(nest(200_000), 200_000);
    }
}
