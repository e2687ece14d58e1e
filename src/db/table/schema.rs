use std::str::FromStr;

use super::column_def::ColumnDef;
use crate::{DataType, DatabaseError};

/// The ordered column list of a relation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    /// The ordered list of column definitions.
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    /// Creates a new schema from a vector of column definitions.
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    /// Parses `<name> <type>` pieces, as found in `create table` column lists
    /// and in the header line of a table file.
    ///
    /// A piece that is not exactly two words is a malformed definition; an
    /// unknown type word is reported by name.
    pub fn parse_definitions<'a>(
        pieces: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, DatabaseError> {
        let mut columns = Vec::new();

        for piece in pieces {
            let words: Vec<&str> = piece.split_whitespace().collect();
            let [name, type_name] = words[..] else {
                return Err(DatabaseError::MalformedColumnDefinition);
            };

            let data_type = DataType::from_str(type_name)
                .map_err(|_| DatabaseError::InvalidType(type_name.to_string()))?;

            columns.push(ColumnDef::new(name, data_type));
        }

        Ok(Self { columns })
    }

    /// Finds the index of the first column with the given name.
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.get_column_index(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The comma-joined `<name> <type>` header line.
    pub fn header(&self) -> String {
        self.columns
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}
