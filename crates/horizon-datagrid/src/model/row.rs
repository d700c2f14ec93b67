//! Rows: declaration-ordered cell collections.
//!
//! A row owns one cell per column, including the special columns, and
//! relays every cell's value change through a single `cell_changed`
//! signal. Aggregates (`is_empty`, validation state) are computed from the
//! live cells on demand, so there is no stale-cache window visible to
//! callers.

use std::collections::HashMap;
use std::sync::Arc;

use horizon_datagrid_core::Signal;
use parking_lot::RwLock;

use super::cell::Cell;
use super::column::Column;
use super::value::CellValue;

/// Payload of [`Row::cell_changed`]: the column name and the new value.
pub type CellChange = (String, CellValue);

/// A single grid row.
///
/// Rows are created in bulk at grid initialization and recycled rather
/// than freed: "deleting" a row clears its data cells and the grid moves
/// it to the end of the row sequence.
pub struct Row {
    /// Cells in column-declaration order.
    cells: RwLock<Vec<Arc<Cell>>>,
    by_name: RwLock<HashMap<String, usize>>,
    /// Relay of every owned cell's value change.
    cell_changed: Arc<Signal<CellChange>>,
}

impl Row {
    /// Creates a row with one empty cell per column.
    pub fn new(columns: &[Arc<Column>]) -> Self {
        let row = Self {
            cells: RwLock::new(Vec::with_capacity(columns.len())),
            by_name: RwLock::new(HashMap::with_capacity(columns.len())),
            cell_changed: Arc::new(Signal::new()),
        };
        for column in columns {
            row.add_cell(column.name(), Arc::new(Cell::new(column.clone())));
        }
        row
    }

    /// The relay signal for value changes of any owned cell.
    pub fn cell_changed(&self) -> &Signal<CellChange> {
        &self.cell_changed
    }

    /// Adds a cell under the given name, replacing any existing cell with
    /// that name while keeping its position.
    pub fn add_cell(&self, name: &str, cell: Arc<Cell>) {
        let relay = self.cell_changed.clone();
        let relay_name = name.to_string();
        cell.value_changed.connect(move |value| {
            relay.emit((relay_name.clone(), value.clone()));
        });

        let mut cells = self.cells.write();
        let mut by_name = self.by_name.write();
        if let Some(&idx) = by_name.get(name) {
            cells[idx] = cell;
        } else {
            by_name.insert(name.to_string(), cells.len());
            cells.push(cell);
        }
    }

    /// Looks up a cell by column name.
    pub fn cell(&self, name: &str) -> Option<Arc<Cell>> {
        let by_name = self.by_name.read();
        let idx = *by_name.get(name)?;
        Some(self.cells.read()[idx].clone())
    }

    /// Snapshot of the cells in column-declaration order.
    pub fn cells(&self) -> Vec<Arc<Cell>> {
        self.cells.read().clone()
    }

    /// Writes a value through to the named cell. A missing column name is
    /// a no-op.
    pub fn set_value(&self, name: &str, value: CellValue) {
        if let Some(cell) = self.cell(name) {
            cell.set_value(value);
        }
    }

    /// `true` when every non-special cell's value is null or blank after
    /// trimming.
    pub fn is_empty(&self) -> bool {
        self.cells
            .read()
            .iter()
            .filter(|c| !c.column().is_special())
            .all(|c| c.value().is_blank())
    }

    /// `true` when any non-special cell carries a validation error.
    pub fn has_validation_errors(&self) -> bool {
        self.cells
            .read()
            .iter()
            .filter(|c| !c.column().is_special())
            .any(|c| c.has_validation_error())
    }

    /// All validation messages as `"<col>: <msg>"` fragments joined with
    /// `"; "`, in column-declaration order.
    pub fn validation_errors_text(&self) -> String {
        let cells = self.cells.read();
        let mut fragments = Vec::new();
        for cell in cells.iter().filter(|c| !c.column().is_special()) {
            for message in cell.validation_errors() {
                fragments.push(format!("{}: {}", cell.column_name(), message));
            }
        }
        fragments.join("; ")
    }

    /// Blanks every non-special cell (row "deletion").
    pub fn clear_values(&self) {
        let cells = self.cells.read().clone();
        for cell in cells.iter().filter(|c| !c.column().is_special()) {
            cell.set_value(CellValue::Null);
        }
    }
}
