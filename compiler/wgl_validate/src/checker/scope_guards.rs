//! Closure-based context management for the checker.
//!
//! Every helper restores what it changed before returning, so a checking
//! routine that bails out early cannot leak a scope or a loop level.

use super::{Checker, FunctionContext};

impl Checker<'_> {
    /// Run `f` inside a fresh lexical scope.
    pub(crate) fn with_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.scopes.push();
        let result = f(self);
        self.scopes.pop();
        result
    }

    /// Run `f` for the body of a function. Parameters and the outermost
    /// statements of the body share the scope opened here.
    pub(crate) fn with_function<T>(
        &mut self,
        context: FunctionContext,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved = self.function.replace(context);
        let saved_loops = std::mem::take(&mut self.loop_depth);
        let saved_switches = std::mem::take(&mut self.switch_depth);

        let result = self.with_scope(f);

        self.function = saved;
        self.loop_depth = saved_loops;
        self.switch_depth = saved_switches;
        result
    }

    /// Run `f` for a loop body, where `break` and `continue` are legal.
    pub(crate) fn with_loop<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.loop_depth += 1;
        let result = f(self);
        self.loop_depth -= 1;
        result
    }

    /// Run `f` for a switch body, where case labels and `break` are legal.
    pub(crate) fn with_switch<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.switch_depth += 1;
        let result = f(self);
        self.switch_depth -= 1;
        result
    }
}
