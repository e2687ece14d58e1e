use std::{
    fs,
    path::PathBuf,
};

use tracing::debug;

use crate::{DatabaseError, Relation, Schema};

/// Reads and writes relations as text files in one directory.
///
/// A table file holds the relation's rendering: a header of comma-separated
/// `<name> <type>` pairs followed by one comma-separated line per row.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
    extension: String,
}

impl FileStore {
    pub fn new(directory: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            extension: extension.into(),
        }
    }

    /// File name of a table, without the directory.
    pub fn file_name(&self, table: &str) -> String {
        format!("{table}.{}", self.extension)
    }

    pub fn path_for(&self, table: &str) -> PathBuf {
        self.directory.join(self.file_name(table))
    }

    /// Reads `<table>.<ext>` into a new relation named `table`.
    ///
    /// Blank lines are skipped. Every row goes through the same arity and
    /// type checks as an insert, and the first failing row aborts the load.
    pub fn load(&self, table: &str) -> Result<Relation, DatabaseError> {
        let file_name = self.file_name(table);
        let path = self.path_for(table);

        let contents = fs::read_to_string(&path).map_err(|err| {
            debug!(path = %path.display(), %err, "cannot read table file");
            DatabaseError::CannotOpen(file_name.clone())
        })?;

        let mut lines = contents.lines();
        let header = lines
            .next()
            .filter(|line| !line.trim().is_empty())
            .ok_or_else(|| DatabaseError::CannotParse(file_name.clone()))?;

        let mut relation = Relation::new(table, Schema::parse_definitions(header.split(','))?);

        for line in lines.filter(|line| !line.trim().is_empty()) {
            relation.append_row(line.split(',').map(str::trim))?;
        }

        debug!(table, rows = relation.num_rows(), "loaded table file");
        Ok(relation)
    }

    /// Writes the relation's rendering to `<name>.<ext>`, replacing any
    /// previous file.
    pub fn store(&self, relation: &Relation) -> Result<(), DatabaseError> {
        let path = self.path_for(&relation.name);

        fs::write(&path, relation.render()).map_err(|err| {
            debug!(path = %path.display(), %err, "cannot write table file");
            DatabaseError::CannotWrite(relation.name.clone())
        })?;

        debug!(table = %relation.name, rows = relation.num_rows(), "stored table file");
        Ok(())
    }
}
