//! Type-aware, stable row sorting.
//!
//! Rows sort by a per-row key derived from the sort column's declared
//! type. Missing or unparsable data resolves to the type's sort-floor (its
//! minimum representable value) so bad data consistently gathers at one
//! end, and rows that are entirely empty always land after the sorted
//! partition, whatever the direction.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::{CellValue, Column, Row, ValueType, coerce};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortDirection {
    /// Smallest key first.
    #[default]
    Ascending,
    /// Largest key first.
    Descending,
}

/// A comparison key resolved from one cell.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SortKey {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl SortKey {
    /// Natural ordering of the resolved type. Keys for one sort all come
    /// from one column, so mismatched variants only arise from custom
    /// payloads; they compare equal, like the unknown cases in a
    /// type-erased compare.
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Int(a), SortKey::Int(b)) => a.cmp(b),
            (SortKey::Float(a), SortKey::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::DateTime(a), SortKey::DateTime(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Derives the sort key for one row.
///
/// A runtime value already matching the declared type passes through;
/// anything else is stringified, trimmed, and parsed. Blank or unparsable
/// values resolve to the declared type's sort-floor.
pub(crate) fn sort_key(row: &Row, column: &Column) -> SortKey {
    let coerced = row
        .cell(column.name())
        .map(|cell| coerce(&cell.value(), column.value_type()))
        .unwrap_or(CellValue::Null);

    match column.value_type() {
        ValueType::Integer | ValueType::Long => {
            SortKey::Int(coerced.as_int().unwrap_or(i64::MIN))
        }
        ValueType::Decimal | ValueType::Float => {
            SortKey::Float(coerced.as_float().unwrap_or(f64::NEG_INFINITY))
        }
        ValueType::Boolean => SortKey::Bool(coerced.as_bool().unwrap_or(false)),
        ValueType::DateTime => {
            SortKey::DateTime(coerced.as_datetime().unwrap_or(NaiveDateTime::MIN))
        }
        ValueType::Text | ValueType::Object => match coerced {
            CellValue::Null => SortKey::Text(String::new()),
            other => SortKey::Text(other.display_string()),
        },
    }
}

/// Stably sorts `rows` in place by the given column.
///
/// Empty rows keep their relative order and are appended after the sorted
/// partition regardless of direction.
pub fn sort_rows(rows: &mut Vec<Arc<Row>>, column: &Column, direction: SortDirection) {
    let (non_empty, empty): (Vec<Arc<Row>>, Vec<Arc<Row>>) =
        rows.drain(..).partition(|row| !row.is_empty());

    let mut keyed: Vec<(SortKey, Arc<Row>)> = non_empty
        .into_iter()
        .map(|row| (sort_key(&row, column), row))
        .collect();

    // Vec::sort_by is stable, which is what preserves relative order
    // among equal (e.g. floored) keys.
    keyed.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Ascending => a.compare(b),
        SortDirection::Descending => a.compare(b).reverse(),
    });

    rows.extend(keyed.into_iter().map(|(_, row)| row));
    rows.extend(empty);
}
