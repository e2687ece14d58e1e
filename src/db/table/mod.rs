pub mod column_def;
pub mod relation;
pub mod row;
pub mod schema;

pub use column_def::ColumnDef;
pub use relation::Relation;
pub use row::Row;
pub use schema::Schema;
