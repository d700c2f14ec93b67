//! Cursor navigation over the grid.
//!
//! The navigator is a small state machine over the full row sequence and
//! the editable (non-special) column subset. It is either uninitialized
//! (no current cell) or positioned; every transition that changes the
//! position emits `navigation_changed` with the old and new locations.
//! Out-of-bounds requests are silently ignored; navigation never partially
//! applies.

use std::sync::Arc;

use horizon_datagrid_core::Signal;
use parking_lot::RwLock;

use crate::error::Fault;
use crate::model::{Cell, Column, Row};

/// Shared row storage, mutated in place by paste/sort/delete operations.
pub(crate) type SharedRows = Arc<RwLock<Vec<Arc<Row>>>>;

/// A cursor position: row index over the full row sequence, column index
/// over the editable column subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row index.
    pub row: usize,
    /// Editable-column index.
    pub column: usize,
}

/// A resolved cursor location carried by navigation events.
#[derive(Clone)]
pub struct CurrentCell {
    /// The position.
    pub position: GridPosition,
    /// The cell at that position.
    pub cell: Arc<Cell>,
}

/// Payload of [`GridNavigator::navigation_changed`].
#[derive(Clone)]
pub struct NavigationChange {
    /// Location before the transition (`None` when uninitialized).
    pub old: Option<CurrentCell>,
    /// Location after the transition.
    pub new: Option<CurrentCell>,
}

/// The cursor state machine.
pub struct GridNavigator {
    rows: SharedRows,
    /// Editable columns in declaration order.
    columns: RwLock<Vec<Arc<Column>>>,
    current: RwLock<Option<GridPosition>>,
    /// Emitted on every effective position change.
    pub navigation_changed: Signal<NavigationChange>,
    /// Error channel for internal navigation faults.
    pub error: Signal<Fault>,
}

impl GridNavigator {
    pub(crate) fn new(rows: SharedRows) -> Self {
        Self {
            rows,
            columns: RwLock::new(Vec::new()),
            current: RwLock::new(None),
            navigation_changed: Signal::new(),
            error: Signal::new(),
        }
    }

    /// Resets to uninitialized, adopts the editable subset of `columns`,
    /// then positions at `(0, 0)` when both rows and editable columns are
    /// non-empty.
    pub fn initialize(&self, columns: &[Arc<Column>]) {
        *self.columns.write() = columns
            .iter()
            .filter(|c| !c.is_special())
            .cloned()
            .collect();
        *self.current.write() = None;

        let has_rows = !self.rows.read().is_empty();
        let has_columns = !self.columns.read().is_empty();
        if has_rows && has_columns {
            self.transition_to(GridPosition { row: 0, column: 0 });
        }
    }

    /// The number of editable columns the column index ranges over.
    pub fn editable_column_count(&self) -> usize {
        self.columns.read().len()
    }

    /// The current position, if positioned.
    pub fn current_position(&self) -> Option<GridPosition> {
        *self.current.read()
    }

    /// The cell at the current position, if positioned.
    pub fn current_cell(&self) -> Option<Arc<Cell>> {
        let position = (*self.current.read())?;
        self.resolve(position)
    }

    /// Moves to an explicit position. Out-of-bounds requests are silently
    /// ignored.
    pub fn move_to_cell(&self, row: usize, column: usize) {
        if row >= self.rows.read().len() || column >= self.editable_column_count() {
            tracing::trace!(
                target: "horizon_datagrid::navigation",
                row,
                column,
                "move_to_cell out of bounds, ignored"
            );
            return;
        }
        self.transition_to(GridPosition { row, column });
    }

    /// Advances to the next editable column, wrapping to the first column
    /// of the next row, and circularly from the last row to the first.
    /// No-op while uninitialized.
    pub fn move_to_next_cell(&self) {
        let Some(current) = self.current_position() else {
            return;
        };
        let columns = self.editable_column_count();
        let rows = self.rows.read().len();
        if columns == 0 || rows == 0 {
            return;
        }

        let mut next = current;
        next.column += 1;
        if next.column >= columns {
            next.column = 0;
            next.row = (next.row + 1) % rows;
        }
        self.transition_to(next);
    }

    /// Retreats to the previous editable column, wrapping to the last
    /// column of the previous row, and circularly from the first row to
    /// the last. No-op while uninitialized.
    pub fn move_to_previous_cell(&self) {
        let Some(current) = self.current_position() else {
            return;
        };
        let columns = self.editable_column_count();
        let rows = self.rows.read().len();
        if columns == 0 || rows == 0 {
            return;
        }

        let mut previous = current;
        if previous.column == 0 {
            previous.column = columns - 1;
            previous.row = if previous.row == 0 {
                rows - 1
            } else {
                previous.row - 1
            };
        } else {
            previous.column -= 1;
        }
        self.transition_to(previous);
    }

    /// Advances to the next row at the same column, circularly. No-op
    /// while uninitialized or when there are no rows.
    pub fn move_to_next_row(&self) {
        let Some(current) = self.current_position() else {
            return;
        };
        let rows = self.rows.read().len();
        if rows == 0 {
            return;
        }
        self.transition_to(GridPosition {
            row: (current.row + 1) % rows,
            column: current.column,
        });
    }

    /// Retreats to the previous row at the same column, circularly. No-op
    /// while uninitialized or when there are no rows.
    pub fn move_to_previous_row(&self) {
        let Some(current) = self.current_position() else {
            return;
        };
        let rows = self.rows.read().len();
        if rows == 0 {
            return;
        }
        self.transition_to(GridPosition {
            row: if current.row == 0 {
                rows - 1
            } else {
                current.row - 1
            },
            column: current.column,
        });
    }

    /// Applies a transition, emitting `navigation_changed` when the
    /// position actually changed. A target that no longer resolves to a
    /// cell is reported on the error signal and leaves state unchanged.
    fn transition_to(&self, target: GridPosition) {
        let old_position = self.current_position();
        if old_position == Some(target) {
            return;
        }

        let Some(new_cell) = self.resolve(target) else {
            self.error.emit(Fault::new(
                "navigate",
                format!(
                    "position ({}, {}) does not resolve to a cell",
                    target.row, target.column
                ),
            ));
            return;
        };

        let old = old_position.and_then(|position| {
            self.resolve(position).map(|cell| CurrentCell { position, cell })
        });

        *self.current.write() = Some(target);
        self.navigation_changed.emit(NavigationChange {
            old,
            new: Some(CurrentCell {
                position: target,
                cell: new_cell,
            }),
        });
    }

    /// Resolves a position to its cell.
    fn resolve(&self, position: GridPosition) -> Option<Arc<Cell>> {
        let rows = self.rows.read();
        let row = rows.get(position.row)?;
        let column = self.columns.read().get(position.column)?.clone();
        row.cell(column.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, ColumnSpec, DELETE_ACTION, ValueType};
    use parking_lot::Mutex;

    fn columns() -> Vec<Arc<Column>> {
        vec![
            Arc::new(Column::from_spec(ColumnSpec::new("A", ValueType::Text))),
            Arc::new(Column::from_spec(ColumnSpec::new("B", ValueType::Text))),
            Arc::new(Column::from_spec(ColumnSpec::new(
                DELETE_ACTION,
                ValueType::Object,
            ))),
        ]
    }

    fn navigator(row_count: usize) -> (GridNavigator, SharedRows) {
        let columns = columns();
        let rows: SharedRows = Arc::new(RwLock::new(
            (0..row_count).map(|_| Arc::new(Row::new(&columns))).collect(),
        ));
        let nav = GridNavigator::new(rows.clone());
        nav.initialize(&columns);
        (nav, rows)
    }

    #[test]
    fn test_initialize_positions_at_origin() {
        let (nav, _rows) = navigator(2);
        assert_eq!(nav.editable_column_count(), 2);
        assert_eq!(nav.current_position(), Some(GridPosition { row: 0, column: 0 }));
        assert_eq!(nav.current_cell().unwrap().column_name(), "A");
    }

    #[test]
    fn test_initialize_empty_grid_stays_uninitialized() {
        let (nav, _rows) = navigator(0);
        assert_eq!(nav.current_position(), None);
        assert!(nav.current_cell().is_none());
        // Transitions from uninitialized are no-ops
        nav.move_to_next_cell();
        nav.move_to_previous_row();
        assert_eq!(nav.current_position(), None);
    }

    #[test]
    fn test_move_to_cell_out_of_bounds_ignored() {
        let (nav, _rows) = navigator(2);
        nav.move_to_cell(5, 0);
        nav.move_to_cell(0, 2); // special column index is out of range
        assert_eq!(nav.current_position(), Some(GridPosition { row: 0, column: 0 }));
    }

    #[test]
    fn test_next_cell_wraps_row_and_grid() {
        let (nav, _rows) = navigator(2);
        nav.move_to_next_cell();
        assert_eq!(nav.current_position(), Some(GridPosition { row: 0, column: 1 }));
        nav.move_to_next_cell();
        assert_eq!(nav.current_position(), Some(GridPosition { row: 1, column: 0 }));
        nav.move_to_next_cell();
        nav.move_to_next_cell();
        // Last editable column of the last row wraps to the origin
        assert_eq!(nav.current_position(), Some(GridPosition { row: 0, column: 0 }));
    }

    #[test]
    fn test_previous_cell_wraps_backwards() {
        let (nav, _rows) = navigator(2);
        nav.move_to_previous_cell();
        assert_eq!(nav.current_position(), Some(GridPosition { row: 1, column: 1 }));
        nav.move_to_previous_cell();
        assert_eq!(nav.current_position(), Some(GridPosition { row: 1, column: 0 }));
    }

    #[test]
    fn test_row_moves_are_circular() {
        let (nav, _rows) = navigator(3);
        nav.move_to_cell(0, 1);
        nav.move_to_previous_row();
        assert_eq!(nav.current_position(), Some(GridPosition { row: 2, column: 1 }));
        nav.move_to_next_row();
        assert_eq!(nav.current_position(), Some(GridPosition { row: 0, column: 1 }));
    }

    #[test]
    fn test_navigation_changed_carries_old_and_new() {
        let (nav, rows) = navigator(2);
        rows.read()[0].set_value("A", CellValue::from("origin"));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        nav.navigation_changed.connect(move |change| {
            let old = change.old.as_ref().map(|c| c.position);
            let new = change.new.as_ref().map(|c| c.position);
            seen_clone.lock().push((old, new));
        });

        nav.move_to_cell(1, 1);
        // Moving to the current position emits nothing
        nav.move_to_cell(1, 1);

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            (
                Some(GridPosition { row: 0, column: 0 }),
                Some(GridPosition { row: 1, column: 1 })
            )
        );
    }

    #[test]
    fn test_rows_added_after_init_are_navigable() {
        let (nav, rows) = navigator(1);
        rows.write().push(Arc::new(Row::new(&columns())));
        nav.move_to_cell(1, 0);
        assert_eq!(nav.current_position(), Some(GridPosition { row: 1, column: 0 }));
    }
}
