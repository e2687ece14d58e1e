use std::fmt;

use tracing::trace;

use super::{column_def::ColumnDef, row::Row, schema::Schema};
use crate::{DatabaseError, Value};

/// A named, fully materialized table: an ordered column list and ordered rows.
///
/// Every row holds one value per column, except transiently while
/// [`Relation::append_column`] assembles a fresh projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// The table name. Intermediate results (joins, projections) are unnamed.
    pub name: String,

    /// The relation's columns.
    pub schema: Schema,

    /// The rows, in insertion order.
    pub rows: Vec<Row>,
}

impl Relation {
    /// Creates an empty relation with the given name and schema.
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            rows: Vec::new(),
        }
    }

    /// Creates an unnamed relation with no columns and no rows.
    pub fn empty() -> Self {
        Self::new("", Schema::default())
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.schema.len()
    }

    /// Appends a column and hands its values out one per row.
    ///
    /// When `values` outnumbers the existing rows, new rows are created that
    /// hold only this column's value. Building a projection one column at a
    /// time relies on this: the first column creates the rows and later
    /// columns of the same length fill them in.
    pub fn append_column(&mut self, column: ColumnDef, values: Vec<Value>) {
        self.schema.columns.push(column);

        for (index, value) in values.into_iter().enumerate() {
            match self.rows.get_mut(index) {
                Some(row) => row.values.push(value),
                None => self.rows.push(Row::new(vec![value])),
            }
        }
    }

    /// Copies the column at `index` of `source` onto the end of this relation.
    pub fn copy_column_from(&mut self, source: &Relation, index: usize) {
        let values = source
            .rows
            .iter()
            .map(|row| row.get_value(index).cloned().unwrap_or(Value::NoValue))
            .collect();

        self.append_column(source.schema.columns[index].clone(), values);
    }

    /// Classifies raw literals and appends them as a row.
    ///
    /// The number of literals must match the column count, and each value
    /// must have its column's declared type unless it is `NaN` or `NOVALUE`.
    /// Nothing is appended when any check fails.
    pub fn append_row<'a, I>(&mut self, raw_values: I) -> Result<(), DatabaseError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let raw_values: Vec<&str> = raw_values.into_iter().collect();
        if raw_values.len() != self.num_columns() {
            return Err(DatabaseError::RowArity);
        }

        let mut values = Vec::with_capacity(raw_values.len());
        for (raw, column) in raw_values.iter().zip(&self.schema.columns) {
            let value = Value::classify(raw)?;

            if !value.fits(column.data_type) {
                return Err(DatabaseError::InvalidInsert {
                    value: (*raw).to_string(),
                    expected: column.data_type.to_string(),
                });
            }

            values.push(value);
        }

        trace!(table = %self.name, "appending row");
        self.rows.push(Row::new(values));
        Ok(())
    }

    /// Appends an already validated row.
    pub(crate) fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Renders the header line followed by one line per row.
    ///
    /// Floats are fixed to three decimals and text is single-quoted, so every
    /// rendered value reads back as the same literal (floats aside).
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(self.schema.header());

        for row in &self.rows {
            let line = row
                .values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            lines.push(line);
        }

        lines.join("\n")
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataType;

    fn points() -> Relation {
        Relation::new(
            "points",
            Schema::new(vec![
                ColumnDef::new("x", DataType::Int),
                ColumnDef::new("y", DataType::Float),
            ]),
        )
    }

    #[test]
    fn test_append_row() {
        let mut table = points();
        table.append_row(["1", "2.5"]).unwrap();
        table.append_row(["NaN", "NOVALUE"]).unwrap();

        assert_eq!(table.num_rows(), 2);
        assert_eq!(
            table.rows[0],
            Row::new(vec![Value::Int(1), Value::Float(2.5)])
        );
        assert_eq!(table.rows[1], Row::new(vec![Value::NaN, Value::NoValue]));
    }

    #[test]
    fn test_append_row_wrong_arity() {
        let mut table = points();
        assert_eq!(table.append_row(["1"]), Err(DatabaseError::RowArity));
        assert_eq!(table.num_rows(), 0);
    }

    #[test]
    fn test_append_row_type_mismatch_leaves_table_unchanged() {
        let mut table = points();
        table.append_row(["1", "1.0"]).unwrap();

        let result = table.append_row(["2", "3"]);
        assert_eq!(
            result,
            Err(DatabaseError::InvalidInsert {
                value: "3".to_string(),
                expected: "float".to_string()
            })
        );
        assert_eq!(table.num_rows(), 1);
    }

    #[test]
    fn test_append_row_unknown_literal() {
        let mut table = points();
        assert_eq!(
            table.append_row(["abc", "1.0"]),
            Err(DatabaseError::UnknownLiteral("abc".to_string()))
        );
        assert_eq!(table.num_rows(), 0);
    }

    #[test]
    fn test_append_column_builds_rows() {
        let mut table = Relation::empty();
        table.append_column(
            ColumnDef::new("a", DataType::Int),
            vec![Value::Int(1), Value::Int(2)],
        );
        table.append_column(
            ColumnDef::new("b", DataType::Text),
            vec![Value::Text("x".to_string()), Value::Text("y".to_string())],
        );

        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.render(), "a int,b string\n1,'x'\n2,'y'");
    }

    #[test]
    fn test_render_header_only() {
        assert_eq!(points().render(), "x int,y float");
    }

    #[test]
    fn test_render_rows() {
        let mut table = points();
        table.append_row(["1", "2.0"]).unwrap();
        table.append_row(["-4", "0.12345"]).unwrap();

        assert_eq!(table.render(), "x int,y float\n1,2.000\n-4,0.123");
    }
}
