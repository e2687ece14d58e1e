//! An embeddable, in-memory relational engine driven by a small textual
//! query language.
//!
//! ```
//! use minirel::Database;
//!
//! let mut db = Database::new();
//! db.transact("create table a (x int, y int)");
//! db.transact("create table b (x int, z string)");
//! db.transact("insert into a values 1, 10");
//! db.transact("insert into a values 2, 20");
//! db.transact("insert into b values 2, 'two'");
//!
//! assert_eq!(db.transact("select * from a, b"), "x int,y int,z string\n2,20,'two'");
//! ```

pub(crate) mod common;
pub(crate) mod db;
pub(crate) mod sql;
pub(crate) mod storage;

pub use common::error::DatabaseError;
pub use common::types::{DataType, Value};
pub use db::{
    database::{Database, DatabaseConfig, QueryOutput},
    join::{join_all, natural_join},
    table::*,
};
pub use sql::{
    evaluator::{arithmetic, compare},
    parser::{ArithmeticOp, ComparisonOp},
};
