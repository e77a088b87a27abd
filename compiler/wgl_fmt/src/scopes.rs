//! Precedence scopes.
//!
//! The printer keeps the operator whose operand it is currently printing.
//! Entering a child operator opens a parenthesis exactly when printing it
//! bare would re-parse differently:
//!
//! - the child binds more loosely than the parent, as in `(a + b) * c`
//! - both bind equally but the associativity points the other way, as in
//!   `a - (b - c)` or `(a = b) = c`
//!
//! Argument lists, brackets and the middle of `?:` reset the context, since
//! their delimiters already group the contents.

use wgl_ir::{Assoc, PrecAssoc};

use crate::Emitter;

/// Which operand of the enclosing operator is being printed.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Operand {
    /// Sole operand, or a position where associativity does not matter.
    Only,
    Left,
    Right,
}

#[derive(Copy, Clone, Debug)]
struct Frame {
    context: PrecAssoc,
    parenthesized: bool,
}

#[derive(Debug)]
pub struct OpScopes {
    context: PrecAssoc,
    stack: Vec<Frame>,
}

impl Default for OpScopes {
    fn default() -> Self {
        Self::new()
    }
}

impl OpScopes {
    pub fn new() -> Self {
        OpScopes {
            context: PrecAssoc::LOWEST,
            stack: Vec::new(),
        }
    }

    /// Whether `child` needs parentheses as operand `operand` of `parent`.
    pub fn needs_parens(parent: PrecAssoc, operand: Operand, child: PrecAssoc) -> bool {
        if child.prec != parent.prec {
            return child.prec < parent.prec;
        }
        matches!(
            (parent.assoc, operand),
            (Assoc::Left, Operand::Right) | (Assoc::Right, Operand::Left)
        )
    }

    /// Start printing an `op` node as operand `operand` of the current
    /// context.
    pub fn enter_op_scope(&mut self, out: &mut dyn Emitter, op: PrecAssoc, operand: Operand) {
        let parenthesized = Self::needs_parens(self.context, operand, op);
        if parenthesized {
            out.emit("(");
        }
        self.push(op, parenthesized);
    }

    pub fn leave_op_scope(&mut self, out: &mut dyn Emitter) {
        if self.pop() {
            out.emit(")");
        }
    }

    /// `(` and a context in which a comma operand needs its own
    /// parentheses. Arguments are printed as right operands.
    pub fn enter_arg_list_scope(&mut self, out: &mut dyn Emitter) {
        out.emit("(");
        self.push(PrecAssoc::ASSIGN, false);
    }

    pub fn leave_arg_list_scope(&mut self, out: &mut dyn Emitter) {
        self.pop();
        out.emit(")");
    }

    /// Reset the context without emitting anything, for text that is
    /// already delimited: brackets, statements and initializers.
    pub fn enter_reset_scope(&mut self, context: PrecAssoc) {
        self.push(context, false);
    }

    pub fn leave_reset_scope(&mut self) {
        self.pop();
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn push(&mut self, context: PrecAssoc, parenthesized: bool) {
        self.stack.push(Frame {
            context: self.context,
            parenthesized,
        });
        self.context = context;
    }

    /// Restore the enclosing context; returns whether the scope opened a
    /// parenthesis.
    fn pop(&mut self) -> bool {
        let Some(frame) = self.stack.pop() else {
            debug_assert!(false, "unbalanced precedence scope");
            return false;
        };
        self.context = frame.context;
        frame.parenthesized
    }
}
