use std::borrow::Cow;

use tracing::trace;

use crate::db::table::{Relation, Row, Schema};

/// Reduces the `from` list of a select to a single relation.
///
/// The relations are joined pairwise, front to back: the first two are
/// replaced by their natural join, which is then joined with the third, and
/// so on. A single relation is passed through without being copied.
/// Returns `None` for an empty list.
pub fn join_all<'a>(relations: Vec<&'a Relation>) -> Option<Cow<'a, Relation>> {
    let mut relations = relations.into_iter();
    let first = Cow::Borrowed(relations.next()?);

    Some(relations.fold(first, |joined, next| {
        Cow::Owned(natural_join(&joined, next))
    }))
}

/// Natural join of two relations.
///
/// Columns are matched by name. Without shared columns the result is the full
/// cross product (`left`-major), with `left`'s columns followed by `right`'s.
/// Otherwise only the cross-product rows whose shared columns hold identical
/// values survive, laid out as the shared columns (in `left`'s order), then
/// `left`'s remaining columns, then `right`'s.
pub fn natural_join(left: &Relation, right: &Relation) -> Relation {
    let shared = shared_columns(left, right);

    let mut schema = Schema::new(Vec::with_capacity(left.num_columns() + right.num_columns()));
    schema.columns.extend_from_slice(&left.schema.columns);
    schema.columns.extend_from_slice(&right.schema.columns);

    let cross = left
        .rows
        .iter()
        .flat_map(|l| right.rows.iter().map(move |r| l.combine(r)));

    if shared.is_empty() {
        let mut product = Relation::new("", schema);
        product.rows = cross.collect();
        trace!(rows = product.num_rows(), "cross product");
        return product;
    }

    // Positions of each shared column's left and right copy within a combined row.
    let pairs: Vec<(usize, usize)> = shared
        .iter()
        .filter_map(|name| {
            let l = left.schema.get_column_index(name)?;
            let r = right.schema.get_column_index(name)?;
            Some((l, left.num_columns() + r))
        })
        .collect();

    let layout: Vec<usize> = pairs
        .iter()
        .map(|(l, _)| *l)
        .chain(
            (0..schema.len()).filter(|&i| !shared.iter().any(|s| *s == schema.columns[i].name)),
        )
        .collect();

    let rows: Vec<Row> = cross
        .filter(|row| {
            pairs
                .iter()
                .all(|&(l, r)| row.values[l].identical(&row.values[r]))
        })
        .map(|row| Row::new(layout.iter().map(|&i| row.values[i].clone()).collect()))
        .collect();

    let mut joined = Relation::new(
        "",
        Schema::new(layout.iter().map(|&i| schema.columns[i].clone()).collect()),
    );
    joined.rows = rows;

    trace!(
        shared = shared.len(),
        rows = joined.num_rows(),
        "natural join"
    );
    joined
}

/// Names present in both relations, in `left`'s column order.
fn shared_columns<'a>(left: &'a Relation, right: &Relation) -> Vec<&'a str> {
    left.schema
        .columns
        .iter()
        .filter(|col| right.schema.has_column(&col.name))
        .map(|col| col.name.as_str())
        .collect()
}
