pub mod database;
pub mod join;
pub mod table;
