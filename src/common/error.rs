use miette::Diagnostic;
use thiserror::Error;

use crate::sql::parser::ComparisonOp;

/// Every failure the engine can report.
///
/// The `Display` output of each variant is exactly the text handed back to the
/// caller of [`Database::transact`](crate::Database::transact), so syntax
/// errors read `Malformed <command>: <text>` and everything else starts with
/// `ERROR:`.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq)]
pub enum DatabaseError {
    /// The query text did not match the grammar of its command.
    #[error("Malformed {command}: {text}")]
    #[diagnostic(code(minirel::syntax))]
    Malformed { command: &'static str, text: String },

    #[error("ERROR: No such table {0}")]
    TableNotFound(String),

    #[error("ERROR: Table already exists: {0}")]
    TableExists(String),

    #[error("ERROR: Cannot find column {0}")]
    ColumnNotFound(String),

    #[error("ERROR: Incorrect amount of values to insert into row")]
    RowArity,

    #[error("ERROR: Invalid type insertion {value} expecting {expected}")]
    InvalidInsert { value: String, expected: String },

    #[error("ERROR: Invalid type {0}")]
    InvalidType(String),

    #[error("ERROR: Malformed column definition")]
    MalformedColumnDefinition,

    #[error("ERROR: Cannot determine type {0}")]
    UnknownLiteral(String),

    #[error("ERROR: Incomparable {left}{op}{right}")]
    Incomparable {
        left: &'static str,
        op: ComparisonOp,
        right: &'static str,
    },

    #[error("ERROR: Invalid type combination {left} and {right}")]
    IncompatibleTypes {
        left: &'static str,
        right: &'static str,
    },

    #[error("ERROR: Arithmetic Error: {0}")]
    InvalidArithmetic(String),

    #[error("ERROR: Invalid column Expression {0}")]
    InvalidExpression(String),

    #[error("ERROR: Invalid where clause {0}")]
    InvalidWhere(String),

    #[error("ERROR: Cannot open file {0}")]
    #[diagnostic(code(minirel::io))]
    CannotOpen(String),

    #[error("ERROR: Unable to parse file {0}")]
    #[diagnostic(code(minirel::io))]
    CannotParse(String),

    #[error("ERROR: writing table to file: {0}")]
    #[diagnostic(code(minirel::io))]
    CannotWrite(String),
}

impl DatabaseError {
    pub(crate) fn malformed(command: &'static str, text: impl Into<String>) -> Self {
        Self::Malformed {
            command,
            text: text.into(),
        }
    }

    /// Whether this error came from a grammar stage rather than evaluation.
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_rendering() {
        let err = DatabaseError::malformed("select", "* wher x > 1");
        assert_eq!(err.to_string(), "Malformed select: * wher x > 1");
        assert!(err.is_syntax_error());
    }

    #[test]
    fn test_semantic_error_rendering() {
        let err = DatabaseError::TableNotFound("fans".to_string());
        assert_eq!(err.to_string(), "ERROR: No such table fans");
        assert!(!err.is_syntax_error());

        let err = DatabaseError::Incomparable {
            left: "string",
            op: ComparisonOp::GreaterThan,
            right: "int",
        };
        assert_eq!(err.to_string(), "ERROR: Incomparable string>int");
    }
}
