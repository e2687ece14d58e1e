use std::fmt;

use crate::sql::parser::{ArithmeticOp, ComparisonOp};

/// The column list of a select.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// `select *`: the joined relation as is.
    Star,

    Targets(Vec<SelectTarget>),
}

/// One comma-separated item of a projection.
///
/// Operands are kept as written. Whether the right operand names a column or
/// is a literal depends on the relation the projection runs against.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectTarget {
    /// A bare column name, copied through unchanged.
    Column(String),

    /// `left op right as alias`
    Computed {
        left: String,
        op: ArithmeticOp,
        right: String,
        alias: String,
    },
}

impl fmt::Display for SelectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectTarget::Column(name) => write!(f, "{name}"),
            SelectTarget::Computed {
                left,
                op,
                right,
                alias,
            } => write!(f, "{left} {op} {right} as {alias}"),
        }
    }
}

/// One conjunct of a `where` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Always a column name.
    pub left: String,

    pub op: ComparisonOp,

    /// A column name or a literal.
    pub right: String,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}
