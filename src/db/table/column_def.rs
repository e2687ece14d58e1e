use crate::DataType;

/// Definition of a single column: its name and declared type.
///
/// Names only need to be unique within a relation; two relations sharing a
/// column name is what drives the natural join.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// The column name.
    pub name: String,

    /// The type every non-marker value in this column must have.
    pub data_type: DataType,
}

impl ColumnDef {
    /// Creates a new column definition.
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_owned(),
            data_type,
        }
    }
}

impl std::fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)
    }
}
