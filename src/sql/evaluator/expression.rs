use std::borrow::Cow;

use tracing::trace;

use crate::{
    DatabaseError, Relation, Row, Schema, Value,
    db::table::ColumnDef,
    sql::{
        evaluator::{Evaluator, Operand, arithmetic},
        parser::{ArithmeticOp, Projection, SelectTarget},
    },
};

/// Computes `left op right` for one row.
///
/// The left operand is always a column; the right one may be a column or a
/// literal.
pub struct ColumnEvaluator {
    left: usize,
    op: ArithmeticOp,
    right: Operand,
}

impl ColumnEvaluator {
    pub fn new(
        left: &str,
        op: ArithmeticOp,
        right: &str,
        schema: &Schema,
    ) -> Result<Self, DatabaseError> {
        Ok(Self {
            left: Operand::column(left, schema)?,
            op,
            right: Operand::resolve(right, schema)?,
        })
    }
}

impl Evaluator<Value> for ColumnEvaluator {
    fn evaluate(&self, row: &Row) -> Result<Value, DatabaseError> {
        let left = Operand::Column(self.left);
        arithmetic(left.value(row), self.op, self.right.value(row))
    }
}

/// Builds the projected relation.
///
/// `*` hands the input back untouched. Otherwise every target becomes one
/// column of a fresh, unnamed relation: bare names copy their column and
/// computed targets are evaluated row by row.
///
/// A computed column is declared with its left operand's type, then retyped
/// to the type of any row's result that is neither `NaN` nor `NOVALUE` and
/// differs from the running type. Dividing two `int` columns, for instance,
/// stays `int` unless some quotient is a `float`.
pub fn project<'a>(
    relation: Cow<'a, Relation>,
    projection: &Projection,
) -> Result<Cow<'a, Relation>, DatabaseError> {
    let Projection::Targets(targets) = projection else {
        return Ok(relation);
    };

    let mut projected = Relation::empty();

    for target in targets {
        match target {
            SelectTarget::Column(name) => {
                let index = Operand::column(name, &relation.schema)?;
                projected.copy_column_from(&relation, index);
            }
            SelectTarget::Computed {
                left,
                op,
                right,
                alias,
            } => {
                let evaluator = ColumnEvaluator::new(left, *op, right, &relation.schema)?;
                let mut data_type = relation.schema.columns[evaluator.left].data_type;

                let values = relation
                    .rows
                    .iter()
                    .map(|row| {
                        let value = evaluator.evaluate(row)?;
                        if let Some(observed) = value.data_type()
                            && observed != data_type
                        {
                            data_type = observed;
                        }
                        Ok(value)
                    })
                    .collect::<Result<Vec<_>, DatabaseError>>()?;

                trace!(%target, %data_type, "computed column");
                projected.append_column(ColumnDef::new(alias, data_type), values);
            }
        }
    }

    Ok(Cow::Owned(projected))
}
