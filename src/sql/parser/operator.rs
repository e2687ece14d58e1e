use std::cmp::Ordering;

use strum::{Display, EnumString};

/// Operators allowed in a projected column expression (`x + y as z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum ArithmeticOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Subtract,
    #[strum(serialize = "*")]
    Multiply,
    #[strum(serialize = "/")]
    Divide,
}

impl ArithmeticOp {
    /// Search order used when picking the operator out of an expression.
    const PRIORITY: [ArithmeticOp; 4] = [Self::Multiply, Self::Add, Self::Subtract, Self::Divide];

    pub fn to_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    /// Returns the first operator, in `* + - /` order, that occurs anywhere
    /// in the text.
    ///
    /// This is a plain substring search: a literal containing one of the
    /// symbols is picked up as an operator.
    pub fn detect(expression: &str) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|op| expression.contains(op.to_symbol()))
    }
}

/// Operators allowed in a `where` condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum ComparisonOp {
    #[strum(to_string = ">=", serialize = "=>")]
    GreaterThanEqual,
    #[strum(to_string = "<=", serialize = "=<")]
    LessThanEqual,
    #[strum(serialize = ">")]
    GreaterThan,
    #[strum(serialize = "<")]
    LessThan,
    #[strum(serialize = "==")]
    Equal,
    #[strum(serialize = "!=")]
    NotEqual,
}

impl ComparisonOp {
    /// Every spelling in the order conditions are searched.
    const SPELLINGS: [(&'static str, ComparisonOp); 8] = [
        (">=", Self::GreaterThanEqual),
        ("=>", Self::GreaterThanEqual),
        ("<=", Self::LessThanEqual),
        ("=<", Self::LessThanEqual),
        (">", Self::GreaterThan),
        ("<", Self::LessThan),
        ("==", Self::Equal),
        ("!=", Self::NotEqual),
    ];

    /// Finds the operator of a condition together with the spelling that
    /// matched, so the caller can split on it.
    ///
    /// Like [`ArithmeticOp::detect`] this is a substring search in fixed
    /// priority order, so `x == 'a>b'` is read as a `>` comparison.
    pub fn detect(condition: &str) -> Option<(Self, &'static str)> {
        Self::SPELLINGS
            .into_iter()
            .find(|(spelling, _)| condition.contains(spelling))
            .map(|(spelling, op)| (op, spelling))
    }

    /// Whether an ordering between the two operands satisfies this operator.
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::GreaterThanEqual => ordering.is_ge(),
            Self::LessThanEqual => ordering.is_le(),
            Self::GreaterThan => ordering.is_gt(),
            Self::LessThan => ordering.is_lt(),
            Self::Equal => ordering.is_eq(),
            Self::NotEqual => ordering.is_ne(),
        }
    }
}
