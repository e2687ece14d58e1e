use crate::{
    DatabaseError, Row, Schema, Value,
    sql::parser::{ArithmeticOp, ComparisonOp},
};

pub mod expression;
pub mod predicate;

pub use expression::project;
pub use predicate::filter;

/// The seam shared by projected columns and `where` conditions.
///
/// - `T = Value` for [`expression::ColumnEvaluator`] (arithmetic)
/// - `T = bool` for [`predicate::ConditionEvaluator`] (filters)
pub trait Evaluator<T> {
    fn evaluate(&self, row: &Row) -> Result<T, DatabaseError>;
}

static MISSING: Value = Value::NoValue;

/// One side of a computed column or a condition, resolved against a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Index of a column in the evaluated relation.
    Column(usize),

    Literal(Value),
}

impl Operand {
    /// A column reference when the schema has a column of that name,
    /// otherwise the text classified as a literal.
    pub fn resolve(text: &str, schema: &Schema) -> Result<Self, DatabaseError> {
        match schema.get_column_index(text) {
            Some(index) => Ok(Operand::Column(index)),
            None => Value::classify(text).map(Operand::Literal),
        }
    }

    /// Resolves text that must name a column.
    pub fn column(name: &str, schema: &Schema) -> Result<usize, DatabaseError> {
        schema
            .get_column_index(name)
            .ok_or_else(|| DatabaseError::ColumnNotFound(name.to_string()))
    }

    pub fn value<'a>(&'a self, row: &'a Row) -> &'a Value {
        match self {
            Operand::Column(index) => row.get_value(*index).unwrap_or(&MISSING),
            Operand::Literal(value) => value,
        }
    }
}

/// Applies an arithmetic operator to two values.
///
/// `NaN` on either side absorbs every operator. `NOVALUE` is not absorbing:
/// it acts as the identity for `+`, the identity on the right of `-` and a
/// negation on its left, zero for `*`, zero on the left of `/` and `NaN` on
/// its right. Mixing `Int` and `Float` promotes to `Float`, and only `+` is
/// defined on text.
///
/// ```
/// use minirel::{ArithmeticOp, Value, arithmetic};
///
/// let seven = Value::Int(7);
/// assert_eq!(arithmetic(&seven, ArithmeticOp::Add, &Value::NoValue).unwrap(), seven);
/// assert_eq!(arithmetic(&Value::NoValue, ArithmeticOp::Subtract, &seven).unwrap(), Value::Int(-7));
/// assert_eq!(arithmetic(&seven, ArithmeticOp::Divide, &Value::NoValue).unwrap(), Value::NaN);
/// ```
pub fn arithmetic(left: &Value, op: ArithmeticOp, right: &Value) -> Result<Value, DatabaseError> {
    match (left, right) {
        (Value::NaN, _) | (_, Value::NaN) => return Ok(Value::NaN),
        (Value::NoValue, Value::NoValue) => return Ok(Value::NoValue),
        (Value::Text(_), Value::Int(_) | Value::Float(_))
        | (Value::Int(_) | Value::Float(_), Value::Text(_)) => {
            return Err(DatabaseError::IncompatibleTypes {
                left: left.type_name(),
                right: right.type_name(),
            });
        }
        _ => {}
    }

    match op {
        ArithmeticOp::Add => values_add(left, right),
        ArithmeticOp::Subtract => values_subtract(left, right),
        ArithmeticOp::Multiply => values_multiply(left, right),
        ArithmeticOp::Divide => values_divide(left, right),
    }
}

pub fn values_add(left: &Value, right: &Value) -> Result<Value, DatabaseError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 + b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a + *b as f64)),
        (Value::Text(a), Value::Text(b)) => Ok(Value::Text(format!(
            "{}{}",
            a.replace('\'', ""),
            b.replace('\'', "")
        ))),
        (other, Value::NoValue) | (Value::NoValue, other) => Ok(other.clone()),
        _ => Err(DatabaseError::InvalidArithmetic(
            "Cannot add elements".to_string(),
        )),
    }
}

pub fn values_subtract(left: &Value, right: &Value) -> Result<Value, DatabaseError> {
    match (left, right) {
        (Value::Text(_), _) | (_, Value::Text(_)) => Err(DatabaseError::InvalidArithmetic(
            "Cannot subtract strings".to_string(),
        )),
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_sub(*b))),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b)),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 - b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a - *b as f64)),
        (other, Value::NoValue) => Ok(other.clone()),
        (Value::NoValue, Value::Int(b)) => Ok(Value::Int(b.wrapping_neg())),
        (Value::NoValue, Value::Float(b)) => Ok(Value::Float(-b)),
        _ => Err(DatabaseError::InvalidArithmetic(
            "Cannot subtract elements".to_string(),
        )),
    }
}

pub fn values_multiply(left: &Value, right: &Value) -> Result<Value, DatabaseError> {
    match (left, right) {
        (Value::Text(_), _) | (_, Value::Text(_)) => Err(DatabaseError::InvalidArithmetic(
            "Cannot multiply strings".to_string(),
        )),
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_mul(*b))),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a * b)),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 * b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a * *b as f64)),
        (Value::Int(_), Value::NoValue) | (Value::NoValue, Value::Int(_)) => Ok(Value::Int(0)),
        (Value::Float(_), Value::NoValue) | (Value::NoValue, Value::Float(_)) => {
            Ok(Value::Float(0.0))
        }
        _ => Err(DatabaseError::InvalidArithmetic(
            "Cannot multiply elements".to_string(),
        )),
    }
}

pub fn values_divide(left: &Value, right: &Value) -> Result<Value, DatabaseError> {
    match (left, right) {
        (Value::Text(_), _) | (_, Value::Text(_)) => Err(DatabaseError::InvalidArithmetic(
            "Cannot divide strings".to_string(),
        )),
        (Value::Int(a), Value::Int(b)) => Ok(a.checked_div(*b).map_or(Value::NaN, Value::Int)),
        (Value::Float(a), Value::Float(b)) => Ok(finite_or_nan(a / b)),
        (Value::Int(a), Value::Float(b)) => Ok(finite_or_nan(*a as f64 / b)),
        (Value::Float(a), Value::Int(b)) => Ok(finite_or_nan(a / *b as f64)),
        (_, Value::NoValue) => Ok(Value::NaN),
        (Value::NoValue, Value::Int(_)) => Ok(Value::Int(0)),
        (Value::NoValue, Value::Float(_)) => Ok(Value::Float(0.0)),
        _ => Err(DatabaseError::InvalidArithmetic(
            "Cannot divide elements".to_string(),
        )),
    }
}

fn finite_or_nan(quotient: f64) -> Value {
    if quotient.is_finite() {
        Value::Float(quotient)
    } else {
        Value::NaN
    }
}

/// Evaluates a comparison between two values.
///
/// `NOVALUE` on either side makes every comparison false. A `NaN` on the
/// left yields "the right side is not `NaN`" for every operator.
/// Text only compares with text (lexicographically); `Int` and `Float` order
/// numerically against each other, while `==` and `!=` require the same
/// variant and payload.
pub fn compare(left: &Value, op: ComparisonOp, right: &Value) -> Result<bool, DatabaseError> {
    if left.is_no_value() || right.is_no_value() {
        return Ok(false);
    }

    if left.is_nan() {
        return Ok(!right.is_nan());
    }

    let ordering = match (left, right) {
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Text(_), _) | (_, Value::Text(_)) => {
            return Err(DatabaseError::Incomparable {
                left: left.type_name(),
                op,
                right: right.type_name(),
            });
        }
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        _ => None,
    };

    let result = match op {
        ComparisonOp::Equal => left.identical(right),
        ComparisonOp::NotEqual => !left.identical(right),
        _ => ordering.is_some_and(|ordering| op.accepts(ordering)),
    };

    Ok(result)
}
