//! Operators and their printing precedence.
//!
//! # Precedence table (lowest to highest)
//!
//! | Level            | Operators                      | Assoc |
//! |------------------|--------------------------------|-------|
//! | `Comma`          | `,`                            | left  |
//! | `Assign`         | `=` and compound assignments   | right |
//! | `Cond`           | `?:`                           | right |
//! | `Or`             | `\|\|`                         | left  |
//! | `Xor`            | `^^`                           | left  |
//! | `And`            | `&&`                           | left  |
//! | `Select`         | `.`                            | none  |
//! | `Equality`       | `==` `!=`                      | left  |
//! | `Relational`     | `<` `>` `<=` `>=`              | left  |
//! | `Additive`       | `+` `-`                        | left  |
//! | `Multiplicative` | `*` `/`                        | left  |
//! | `Prefix`         | `++` `--` `!` `-` `+`          | right |
//! | `Postfix`        | `++` `--`                      | left  |
//! | `Highest`        | call, index                    | none  |
//!
//! The `Select` slot is kept for table fidelity; printers render member
//! access at `Highest`, as the parser binds it.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparison
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,

    // Logical
    And,
    Or,
    Xor,
}

impl BinaryOp {
    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::And => "&&",
            Self::Or => "||",
            Self::Xor => "^^",
        }
    }

    pub const fn precedence(self) -> Precedence {
        match self {
            Self::Mul | Self::Div => Precedence::Multiplicative,
            Self::Add | Self::Sub => Precedence::Additive,
            Self::Lt | Self::Gt | Self::Le | Self::Ge => Precedence::Relational,
            Self::Eq | Self::Ne => Precedence::Equality,
            Self::And => Precedence::And,
            Self::Xor => Precedence::Xor,
            Self::Or => Precedence::Or,
        }
    }

    /// All binary operators associate to the left.
    pub const fn prec_assoc(self) -> PrecAssoc {
        PrecAssoc::new(self.precedence(), Assoc::Left)
    }

    pub const fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div)
    }

    pub const fn is_relational(self) -> bool {
        matches!(self, Self::Lt | Self::Gt | Self::Le | Self::Ge)
    }

    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::Ne)
    }

    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Xor)
    }

    /// Relational operator with its operands swapped: `a < b` is `b > a`.
    pub const fn reversed(self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::Gt => Self::Lt,
            Self::Le => Self::Ge,
            Self::Ge => Self::Le,
            other => other,
        }
    }
}

/// Prefix operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Plus,
    /// `!x`
    Not,
    /// `++x`
    PreInc,
    /// `--x`
    PreDec,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Plus => "+",
            Self::Not => "!",
            Self::PreInc => "++",
            Self::PreDec => "--",
        }
    }

    pub const fn prec_assoc(self) -> PrecAssoc {
        PrecAssoc::new(Precedence::Prefix, Assoc::Right)
    }

    pub const fn is_increment(self) -> bool {
        matches!(self, Self::PreInc | Self::PreDec)
    }
}

/// Postfix operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PostOp {
    Inc,
    Dec,
}

impl PostOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Inc => "++",
            Self::Dec => "--",
        }
    }

    pub const fn prec_assoc(self) -> PrecAssoc {
        PrecAssoc::new(Precedence::Postfix, Assoc::Left)
    }
}

/// Printing precedence levels, lowest first.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Precedence {
    Lowest,
    Comma,
    Assign,
    Cond,
    Or,
    Xor,
    And,
    Select,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Prefix,
    Postfix,
    Highest,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Assoc {
    Left,
    Right,
    None,
}

/// A precedence level together with its associativity.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct PrecAssoc {
    pub prec: Precedence,
    pub assoc: Assoc,
}

impl PrecAssoc {
    pub const LOWEST: PrecAssoc = PrecAssoc::new(Precedence::Lowest, Assoc::None);
    pub const COMMA: PrecAssoc = PrecAssoc::new(Precedence::Comma, Assoc::Left);
    pub const ASSIGN: PrecAssoc = PrecAssoc::new(Precedence::Assign, Assoc::Right);
    pub const COND: PrecAssoc = PrecAssoc::new(Precedence::Cond, Assoc::Right);
    pub const HIGHEST: PrecAssoc = PrecAssoc::new(Precedence::Highest, Assoc::None);

    pub const fn new(prec: Precedence, assoc: Assoc) -> Self {
        PrecAssoc { prec, assoc }
    }
}
