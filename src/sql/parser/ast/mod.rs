pub(crate) mod expression;
pub(crate) mod statement;

pub use expression::{Condition, Projection, SelectTarget};
pub use statement::{SelectStatement, Statement};
