use std::borrow::Cow;

use tracing::trace;

use crate::{
    DatabaseError, Relation, Row, Schema,
    sql::{
        evaluator::{Evaluator, Operand, compare},
        parser::{ComparisonOp, Condition},
    },
};

/// Tests one `where` conjunct against a row.
pub struct ConditionEvaluator {
    left: usize,
    op: ComparisonOp,
    right: Operand,
}

impl ConditionEvaluator {
    pub fn new(condition: &Condition, schema: &Schema) -> Result<Self, DatabaseError> {
        Ok(Self {
            left: Operand::column(&condition.left, schema)?,
            op: condition.op,
            right: Operand::resolve(&condition.right, schema)?,
        })
    }
}

impl Evaluator<bool> for ConditionEvaluator {
    fn evaluate(&self, row: &Row) -> Result<bool, DatabaseError> {
        let left = Operand::Column(self.left);
        compare(left.value(row), self.op, self.right.value(row))
    }
}

/// Keeps the rows satisfying every condition.
///
/// Each condition is its own pass over the survivors of the previous one.
/// Without conditions the input is returned as is.
pub fn filter<'a>(
    relation: Cow<'a, Relation>,
    conditions: &[Condition],
) -> Result<Cow<'a, Relation>, DatabaseError> {
    let mut relation = relation;

    for condition in conditions {
        let evaluator = ConditionEvaluator::new(condition, &relation.schema)?;

        let mut kept = Vec::new();
        for row in &relation.rows {
            if evaluator.evaluate(row)? {
                kept.push(row.clone());
            }
        }

        trace!(%condition, before = relation.num_rows(), after = kept.len(), "filtered");

        let mut filtered = Relation::new(relation.name.clone(), relation.schema.clone());
        filtered.rows = kept;
        relation = Cow::Owned(filtered);
    }

    Ok(relation)
}
