use crate::db::table::Schema;

use super::{Condition, Projection};

/// A parsed query (top-level AST node).
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `create table <name> (<col> <type>, ...)`
    CreateTable { name: String, schema: Schema },

    /// `create table <name> as select ...`
    CreateFromSelect {
        name: String,
        select: SelectStatement,
    },

    /// `load <name>`
    Load { name: String },

    /// `store <name>`
    Store { name: String },

    /// `drop table <name>`
    Drop { name: String },

    /// `insert into <name> values <v>, ...`
    ///
    /// Values are kept as written and classified against the table's schema.
    Insert { table: String, values: Vec<String> },

    /// `print <name>`
    Print { name: String },

    Select(SelectStatement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub projection: Projection,

    /// Relations to natural-join, in `from` order.
    pub tables: Vec<String>,

    /// Conjuncts of the `where` clause; empty without one.
    pub conditions: Vec<Condition>,
}
