use std::{borrow::Cow, collections::BTreeMap, fmt, path::PathBuf};

use tracing::{debug, warn};

use crate::{
    DatabaseError,
    db::{
        join::join_all,
        table::{Relation, Schema},
    },
    sql::{
        evaluator::{filter, project},
        parser::{self, SelectStatement, Statement},
    },
    storage::FileStore,
};

/// Where `load` and `store` look for table files.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// Directory holding the table files.
    pub data_directory: PathBuf,

    /// File extension of a table file, without the dot.
    pub extension: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from("."),
            extension: "tbl".to_string(),
        }
    }
}

/// What a successful query produced.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    /// Commands that only change state.
    Empty,

    /// `print` and `select`.
    Relation(Relation),
}

impl fmt::Display for QueryOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOutput::Empty => Ok(()),
            QueryOutput::Relation(relation) => write!(f, "{}", relation.render()),
        }
    }
}

/// The main database handle.
///
/// `Database` owns every table by name and runs textual queries against
/// them. A query either succeeds completely or leaves every table exactly as
/// it was.
#[derive(Debug)]
pub struct Database {
    /// All tables currently loaded, by name.
    pub tables: BTreeMap<String, Relation>,

    store: FileStore,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Creates an empty database reading and writing table files in the
    /// current directory.
    pub fn new() -> Self {
        Self::with_config(DatabaseConfig::default())
    }

    pub fn with_config(config: DatabaseConfig) -> Self {
        Self {
            tables: BTreeMap::new(),
            store: FileStore::new(config.data_directory, config.extension),
        }
    }

    /// Runs one query and renders the outcome as text.
    ///
    /// Success without output is the empty string, `print` and `select`
    /// return the rendered relation and any failure returns its message.
    /// Nothing is ever propagated past this call.
    ///
    /// ```
    /// use minirel::Database;
    ///
    /// let mut db = Database::new();
    /// assert_eq!(db.transact("create table t (x int, y float)"), "");
    /// assert_eq!(db.transact("insert into t values 1, 2.5"), "");
    /// assert_eq!(db.transact("select x + y as z from t"), "z float\n3.500");
    /// assert_eq!(db.transact("print nope"), "ERROR: No such table nope");
    /// ```
    pub fn transact(&mut self, query: &str) -> String {
        match self.execute(query) {
            Ok(output) => output.to_string(),
            Err(err) => {
                debug!(%err, "query failed");
                err.to_string()
            }
        }
    }

    /// Parses and runs one query.
    pub fn execute(&mut self, query: &str) -> Result<QueryOutput, DatabaseError> {
        let statement = parser::parse(query)?;

        match statement {
            Statement::CreateTable { name, schema } => {
                debug!(table = %name, columns = schema.len(), "create table");
                self.create_table(&name, schema)?;
            }
            Statement::CreateFromSelect { name, select } => {
                debug!(table = %name, from = ?select.tables, "create table from select");
                let mut relation = self.select(&select)?.into_owned();
                relation.name = name;
                self.add_table(relation)?;
            }
            Statement::Load { name } => {
                debug!(table = %name, "load");
                self.load_table(&name)?;
            }
            Statement::Store { name } => {
                debug!(table = %name, "store");
                self.store_table(&name)?;
            }
            Statement::Drop { name } => {
                debug!(table = %name, "drop table");
                self.drop_table(&name)?;
            }
            Statement::Insert { table, values } => {
                debug!(%table, values = values.len(), "insert");
                self.insert_row(&table, values.iter().map(String::as_str))?;
            }
            Statement::Print { name } => {
                debug!(table = %name, "print");
                return Ok(QueryOutput::Relation(self.get_table(&name)?.clone()));
            }
            Statement::Select(select) => {
                debug!(from = ?select.tables, "select");
                return Ok(QueryOutput::Relation(self.select(&select)?.into_owned()));
            }
        }

        Ok(QueryOutput::Empty)
    }

    /// Evaluates a select: natural join of the `from` tables, then the
    /// projection, then the `where` conditions.
    ///
    /// `select * from t` without conditions borrows `t` rather than copying it.
    pub fn select(&self, select: &SelectStatement) -> Result<Cow<'_, Relation>, DatabaseError> {
        let mut relations = Vec::with_capacity(select.tables.len());
        for name in select.tables.iter().rev() {
            relations.push(self.get_table(name)?);
        }
        relations.reverse();

        let joined = join_all(relations).unwrap_or_else(|| Cow::Owned(Relation::empty()));
        let projected = project(joined, &select.projection)?;
        filter(projected, &select.conditions)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Gets an immutable reference to a table.
    pub fn get_table(&self, name: &str) -> Result<&Relation, DatabaseError> {
        self.tables
            .get(name)
            .ok_or_else(|| DatabaseError::TableNotFound(name.to_string()))
    }

    /// Creates a new empty table with the given schema.
    pub fn create_table(&mut self, name: &str, schema: Schema) -> Result<(), DatabaseError> {
        self.add_table(Relation::new(name, schema))
    }

    /// Registers a relation under its own name.
    pub fn add_table(&mut self, relation: Relation) -> Result<(), DatabaseError> {
        if self.has_table(&relation.name) {
            return Err(DatabaseError::TableExists(relation.name));
        }

        self.tables.insert(relation.name.clone(), relation);
        Ok(())
    }

    /// Removes a table from memory. Its file, if any, is left alone.
    pub fn drop_table(&mut self, name: &str) -> Result<Relation, DatabaseError> {
        self.tables
            .remove(name)
            .ok_or_else(|| DatabaseError::TableNotFound(name.to_string()))
    }

    /// Appends one row of raw literals to a table.
    pub fn insert_row<'a, I>(&mut self, name: &str, raw_values: I) -> Result<(), DatabaseError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.tables
            .get_mut(name)
            .ok_or_else(|| DatabaseError::TableNotFound(name.to_string()))?
            .append_row(raw_values)
    }

    /// Reads a table from its file, replacing any table of the same name.
    ///
    /// The existing table is only replaced once the whole file has been read
    /// successfully.
    pub fn load_table(&mut self, name: &str) -> Result<(), DatabaseError> {
        let relation = self.store.load(name)?;

        if self.tables.insert(name.to_string(), relation).is_some() {
            warn!(table = name, "load replaced an existing table");
        }
        Ok(())
    }

    /// Writes a table to its file.
    pub fn store_table(&self, name: &str) -> Result<(), DatabaseError> {
        self.store.store(self.get_table(name)?)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::{DataType, Value, db::table::ColumnDef};

    fn database() -> Database {
        let mut db = Database::new();
        db.transact("create table teams (City string, Wins int, Losses int)");
        db.transact("insert into teams values 'Berkeley', 9, 3");
        db.transact("insert into teams values 'Stanford', 4, 8");
        db
    }

    #[test]
    fn test_create_table() {
        let mut db = Database::new();
        db.execute("create table t (x int, y string)").unwrap();

        let table = db.get_table("t").unwrap();
        assert_eq!(
            table.schema.columns,
            vec![
                ColumnDef::new("x", DataType::Int),
                ColumnDef::new("y", DataType::Text),
            ]
        );
        assert_eq!(table.num_rows(), 0);
    }

    #[test]
    fn test_create_existing_table_fails() {
        let mut db = database();
        assert_eq!(
            db.transact("create table teams (x int)"),
            "ERROR: Table already exists: teams"
        );
        assert_eq!(db.get_table("teams").unwrap().num_columns(), 3);
    }

    #[test]
    fn test_insert_validates_before_appending() {
        let mut db = database();

        assert_eq!(
            db.transact("insert into teams values 'Davis', 1"),
            "ERROR: Incorrect amount of values to insert into row"
        );
        assert_eq!(
            db.transact("insert into teams values 'Davis', 1.5, 2"),
            "ERROR: Invalid type insertion 1.5 expecting int"
        );
        assert_eq!(db.get_table("teams").unwrap().num_rows(), 2);

        assert_eq!(db.transact("insert into teams values 'Davis', NaN, NOVALUE"), "");
        assert_eq!(
            db.get_table("teams").unwrap().rows[2].values,
            vec![Value::Text("Davis".to_string()), Value::NaN, Value::NoValue]
        );
    }

    #[test]
    fn test_insert_into_missing_table() {
        let mut db = Database::new();
        assert_eq!(
            db.transact("insert into t values 1"),
            "ERROR: No such table t"
        );
    }

    #[test]
    fn test_print_renders_table() {
        let mut db = database();
        assert_eq!(
            db.transact("print teams"),
            "City string,Wins int,Losses int\n'Berkeley',9,3\n'Stanford',4,8"
        );
    }

    #[test]
    fn test_drop_table() {
        let mut db = database();
        assert_eq!(db.transact("drop table teams"), "");
        assert!(!db.has_table("teams"));
        assert_eq!(db.transact("drop table teams"), "ERROR: No such table teams");
    }

    #[test]
    fn test_select_projects_then_filters() {
        let mut db = database();
        assert_eq!(
            db.transact("select City, Wins - Losses as Diff from teams where Diff > 0"),
            "City string,Diff int\n'Berkeley',6"
        );
        assert_eq!(
            db.transact("select City from teams where Wins > 5"),
            "ERROR: Cannot find column Wins"
        );
    }

    #[test]
    fn test_select_star_borrows() {
        let db = database();
        let select = match parser::parse("select * from teams").unwrap() {
            Statement::Select(select) => select,
            other => panic!("expected a select, got {other:?}"),
        };

        let result = db.select(&select).unwrap();
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_select_reports_last_missing_table_first() {
        let mut db = Database::new();
        assert_eq!(
            db.transact("select * from a, b"),
            "ERROR: No such table b"
        );
    }

    #[test]
    fn test_create_from_select() {
        let mut db = database();
        assert_eq!(
            db.transact("create table winners as select City, Wins from teams where Wins > 5"),
            ""
        );
        assert_eq!(db.transact("print winners"), "City string,Wins int\n'Berkeley',9");
        assert_eq!(db.get_table("winners").unwrap().name, "winners");

        assert_eq!(
            db.transact("create table winners as select * from teams"),
            "ERROR: Table already exists: winners"
        );
    }

    #[test]
    fn test_store_and_load() {
        let dir = tempdir().unwrap();
        let mut db = Database::with_config(DatabaseConfig {
            data_directory: dir.path().to_path_buf(),
            extension: "tbl".to_string(),
        });

        db.transact("create table teams (City string, Wins int)");
        db.transact("insert into teams values 'Berkeley', 9");
        assert_eq!(db.transact("store teams"), "");
        assert!(dir.path().join("teams.tbl").exists());

        db.transact("insert into teams values 'Stanford', 4");
        assert_eq!(db.transact("load teams"), "");
        assert_eq!(db.transact("print teams"), "City string,Wins int\n'Berkeley',9");
    }

    #[test]
    fn test_failed_load_keeps_existing_table() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("teams.tbl"), "City string\n'Davis'\n7\n").unwrap();

        let mut db = Database::with_config(DatabaseConfig {
            data_directory: dir.path().to_path_buf(),
            ..DatabaseConfig::default()
        });
        db.transact("create table teams (x int)");
        db.transact("insert into teams values 1");

        assert_eq!(
            db.transact("load teams"),
            "ERROR: Invalid type insertion 7 expecting string"
        );
        assert_eq!(db.transact("print teams"), "x int\n1");
    }

    #[test]
    fn test_store_missing_table() {
        let db = Database::new();
        assert_eq!(
            db.store_table("nope"),
            Err(DatabaseError::TableNotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_query_output_display() {
        assert_eq!(QueryOutput::Empty.to_string(), "");

        let relation = Relation::new("t", Schema::new(vec![ColumnDef::new("x", DataType::Int)]));
        assert_eq!(QueryOutput::Relation(relation).to_string(), "x int");
    }
}
