use std::fmt;

use strum::{Display, EnumString};

use crate::DatabaseError;

/// Column types a relation can declare.
///
/// Written in queries and table files as `int`, `float` and `string`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum DataType {
    /// Signed integer column.
    #[strum(serialize = "int")]
    Int,

    /// Double precision column, rendered with three decimals.
    #[strum(serialize = "float")]
    Float,

    /// Single-quoted text column.
    #[strum(serialize = "string")]
    Text,
}

/// A single scalar stored in a row.
///
/// Besides the three typed variants there are two markers: [`Value::NaN`],
/// which absorbs every arithmetic operator, and [`Value::NoValue`], the
/// "missing" marker whose arithmetic role depends on the operator and on which
/// side it appears. Neither marker carries a [`DataType`], so both can be
/// stored in any column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),

    Float(f64),

    /// Text without its surrounding quotes.
    Text(String),

    NaN,

    NoValue,
}

impl Value {
    /// Classifies a literal as written in a query or a table file.
    ///
    /// Anything containing a single quote is text, anything containing a
    /// decimal point is a float, the keywords `NaN` and `NOVALUE` map to their
    /// markers and the rest must parse as an integer.
    ///
    /// ```
    /// use minirel::Value;
    ///
    /// assert_eq!(Value::classify("'Lee'").unwrap(), Value::Text("Lee".to_string()));
    /// assert_eq!(Value::classify("2.5").unwrap(), Value::Float(2.5));
    /// assert_eq!(Value::classify("NOVALUE").unwrap(), Value::NoValue);
    /// assert_eq!(Value::classify("42").unwrap(), Value::Int(42));
    /// assert!(Value::classify("Lee").is_err());
    /// ```
    pub fn classify(literal: &str) -> Result<Self, DatabaseError> {
        let unknown = || DatabaseError::UnknownLiteral(literal.to_string());

        if literal.contains('\'') {
            return Ok(Value::Text(literal.trim_matches('\'').to_string()));
        }

        if literal.contains('.') {
            return literal
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| unknown());
        }

        match literal {
            "NaN" => Ok(Value::NaN),
            "NOVALUE" => Ok(Value::NoValue),
            _ => literal.parse::<i64>().map(Value::Int).map_err(|_| unknown()),
        }
    }

    /// Returns the column type this value belongs to.
    ///
    /// The two markers have no type and return `None`.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Int(_) => Some(DataType::Int),
            Value::Float(_) => Some(DataType::Float),
            Value::Text(_) => Some(DataType::Text),
            Value::NaN | Value::NoValue => None,
        }
    }

    /// Name of the variant as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "string",
            Value::NaN => "NaN",
            Value::NoValue => "NOVALUE",
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Value::NaN)
    }

    pub fn is_no_value(&self) -> bool {
        matches!(self, Value::NoValue)
    }

    /// Whether a value may be stored in a column of the given type.
    pub fn fits(&self, data_type: DataType) -> bool {
        self.data_type().is_none_or(|own| own == data_type)
    }

    /// Exact variant and payload equality, as used by the natural join.
    ///
    /// Markers only match themselves and an `Int` never matches an equal
    /// `Float`.
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::NaN, Value::NaN) | (Value::NoValue, Value::NoValue) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(fl) => write!(f, "{fl:.3}"),
            Value::Text(s) => write!(f, "'{s}'"),
            Value::NaN => write!(f, "NaN"),
            Value::NoValue => write!(f, "NOVALUE"),
        }
    }
}
