//! Grid orchestration: assembly of the data model, validation engine,
//! navigator, clipboard paste, and sort entry points.
//!
//! `DataGrid` is the single logical owner of a grid instance. All mutation
//! entry points are expected to be driven from one coordination context at
//! a time; the engine performs no cross-call locking of its own.

use std::sync::Arc;

use horizon_datagrid_core::Signal;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::clipboard;
use crate::error::{Fault, GridError};
use crate::model::{
    CellValue, Column, ColumnSpec, Row, VALID_ALERTS, is_special_name,
};
use crate::navigation::{GridNavigator, SharedRows};
use crate::sort::{SortDirection, sort_rows};
use crate::validation::{ValidationEngine, ValidationResult, ValidationRule};

/// Grid-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// The row floor: the grid always holds at least this many rows,
    /// created up front and recycled on deletion.
    #[serde(default = "default_minimum_rows")]
    pub minimum_rows: usize,
}

fn default_minimum_rows() -> usize {
    50
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            minimum_rows: default_minimum_rows(),
        }
    }
}

/// Payload of [`GridSignals::cell_changed`].
#[derive(Clone)]
pub struct CellChanged {
    /// The row whose cell changed. Carried as a handle: indices are
    /// unstable across sorts, the row itself is not.
    pub row: Arc<Row>,
    /// The column name.
    pub column: String,
    /// The new value.
    pub value: CellValue,
}

/// Signals emitted by the grid itself.
///
/// The validation engine and the navigator expose their own signals
/// (`row_validated`, `navigation_changed`, and per-component error
/// channels).
pub struct GridSignals {
    /// Emitted on every effective cell value change, after the
    /// auto-revalidation hook ran for that cell.
    pub cell_changed: Signal<CellChanged>,
    /// Emitted after the row sequence was reordered (sort, deletion).
    pub rows_reordered: Signal<()>,
    /// Error channel for grid-level operation faults.
    pub error: Signal<Fault>,
}

impl GridSignals {
    fn new() -> Self {
        Self {
            cell_changed: Signal::new(),
            rows_reordered: Signal::new(),
            error: Signal::new(),
        }
    }
}

/// An editable grid instance.
///
/// # Example
///
/// ```
/// use horizon_datagrid::{ColumnSpec, DataGrid, GridConfig, ValueType, CellValue};
///
/// let grid = DataGrid::new(
///     vec![
///         ColumnSpec::new("Name", ValueType::Text),
///         ColumnSpec::new("Age", ValueType::Integer),
///     ],
///     GridConfig { minimum_rows: 10 },
/// )
/// .unwrap();
///
/// grid.set_value(0, "Name", CellValue::from("Ada"));
/// assert!(!grid.row(0).unwrap().is_empty());
/// assert_eq!(grid.row_count(), 10);
/// ```
pub struct DataGrid {
    columns: Vec<Arc<Column>>,
    rows: SharedRows,
    engine: Arc<ValidationEngine>,
    navigator: GridNavigator,
    signals: Arc<GridSignals>,
    config: GridConfig,
}

impl DataGrid {
    /// Builds a grid from column declarations.
    ///
    /// This is the engine's only fallible boundary: an empty column list
    /// or a duplicate column name is a structural fault and is rejected.
    pub fn new(specs: Vec<ColumnSpec>, config: GridConfig) -> Result<Self, GridError> {
        if specs.is_empty() {
            return Err(GridError::NoColumns);
        }
        let mut seen = std::collections::HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.name.clone()) {
                return Err(GridError::DuplicateColumn(spec.name.clone()));
            }
        }

        let columns: Vec<Arc<Column>> = specs
            .into_iter()
            .map(|spec| Arc::new(Column::from_spec(spec)))
            .collect();

        // The navigator shares the grid's row storage.
        let rows: SharedRows = Arc::new(RwLock::new(Vec::new()));
        let grid = Self {
            columns,
            rows: rows.clone(),
            engine: Arc::new(ValidationEngine::new()),
            navigator: GridNavigator::new(rows),
            signals: Arc::new(GridSignals::new()),
            config,
        };

        for _ in 0..grid.config.minimum_rows {
            let row = grid.make_row();
            grid.rows.write().push(row);
        }
        grid.navigator.initialize(&grid.columns);

        tracing::debug!(
            target: "horizon_datagrid::grid",
            columns = grid.columns.len(),
            rows = grid.config.minimum_rows,
            "grid initialized"
        );
        Ok(grid)
    }

    // -------------------------------------------------------------------------
    // Structure access
    // -------------------------------------------------------------------------

    /// All columns in declaration order, special columns included.
    pub fn columns(&self) -> &[Arc<Column>] {
        &self.columns
    }

    /// The editable (non-special) columns in declaration order.
    pub fn editable_columns(&self) -> Vec<Arc<Column>> {
        self.columns
            .iter()
            .filter(|c| !c.is_special())
            .cloned()
            .collect()
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Arc<Column>> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// The current row count.
    pub fn row_count(&self) -> usize {
        self.rows.read().len()
    }

    /// The row at an index.
    pub fn row(&self, index: usize) -> Option<Arc<Row>> {
        self.rows.read().get(index).cloned()
    }

    /// A snapshot of the row sequence.
    pub fn rows(&self) -> Vec<Arc<Row>> {
        self.rows.read().clone()
    }

    /// The cursor state machine.
    pub fn navigator(&self) -> &GridNavigator {
        &self.navigator
    }

    /// The validation engine (rule registry, `row_validated` and error
    /// signals).
    pub fn validation(&self) -> &ValidationEngine {
        &self.engine
    }

    /// The grid's own signals.
    pub fn signals(&self) -> &GridSignals {
        &self.signals
    }

    /// The configuration the grid was built with.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Writes a value through the data model. An unknown column is a
    /// no-op; an out-of-range row is an operation fault.
    pub fn set_value(&self, row: usize, column: &str, value: CellValue) {
        match self.row(row) {
            Some(row) => row.set_value(column, value),
            None => self.signals.error.emit(Fault::new(
                "set_value",
                format!("row index {row} out of range"),
            )),
        }
    }

    /// "Deletes" a row: clears its data cells, wipes its validation
    /// state, and relocates it to the end of the row sequence. Rows are
    /// recycled, never freed.
    pub fn delete_row(&self, index: usize) {
        let Some(row) = self.row(index) else {
            self.signals.error.emit(Fault::new(
                "delete_row",
                format!("row index {index} out of range"),
            ));
            return;
        };

        row.clear_values();
        for cell in row.cells() {
            cell.set_validation_errors(Vec::new());
        }
        if let Some(alerts) = row.cell(VALID_ALERTS) {
            alerts.set_value(CellValue::Null);
        }

        {
            let mut rows = self.rows.write();
            let row = rows.remove(index);
            rows.push(row);
        }
        self.signals.rows_reordered.emit(());
    }

    /// Appends one freshly created empty row. Returns its index.
    pub fn append_row(&self) -> usize {
        let row = self.make_row();
        let mut rows = self.rows.write();
        rows.push(row);
        rows.len() - 1
    }

    /// Pastes tab-delimited text starting at the current navigation
    /// position.
    ///
    /// The row sequence is extended with new empty rows as needed; columns
    /// beyond the editable count are silently truncated. A full
    /// revalidation pass runs after the write. Pasting with an
    /// uninitialized cursor is an operation fault and writes nothing.
    pub fn paste(&self, text: &str) {
        let Some(position) = self.navigator.current_position() else {
            self.signals.error.emit(Fault::new(
                "paste",
                "no current cell to paste at",
            ));
            return;
        };

        let block = clipboard::deserialize(text);
        let editable = self.editable_columns();

        for (i, values) in block.iter().enumerate() {
            let row_index = position.row + i;
            while row_index >= self.row_count() {
                self.append_row();
            }
            let row = self.row(row_index).expect("row just ensured");
            for (j, value) in values.iter().enumerate() {
                let column_index = position.column + j;
                let Some(column) = editable.get(column_index) else {
                    break; // truncate past the editable columns
                };
                row.set_value(column.name(), CellValue::from(value.as_str()));
            }
        }

        tracing::debug!(
            target: "horizon_datagrid::grid",
            rows = block.len(),
            at_row = position.row,
            at_column = position.column,
            "paste applied"
        );
        self.validate_all();
    }

    /// Sorts rows by a column. Unknown, special, or non-sortable columns
    /// are operation faults and leave the order unchanged.
    pub fn sort(&self, column: &str, direction: SortDirection) {
        let Some(column) = self.column(column).cloned() else {
            self.signals.error.emit(Fault::new(
                "sort",
                format!("unknown column '{column}'"),
            ));
            return;
        };
        if column.is_special() || !column.is_sortable() {
            self.signals.error.emit(Fault::new(
                "sort",
                format!("column '{}' is not sortable", column.name()),
            ));
            return;
        }

        sort_rows(&mut self.rows.write(), &column, direction);
        tracing::debug!(
            target: "horizon_datagrid::sort",
            column = %column.name(),
            ?direction,
            "rows sorted"
        );
        self.signals.rows_reordered.emit(());
    }

    // -------------------------------------------------------------------------
    // Validation entry points
    // -------------------------------------------------------------------------

    /// Registers a validation rule.
    pub fn add_rule(&self, rule: ValidationRule) {
        self.engine.add_rule(rule);
    }

    /// Removes a validation rule by identity. Idempotent.
    pub fn remove_rule(&self, column: &str, name: &str) -> bool {
        self.engine.remove_rule(column, name)
    }

    /// Removes all rules for one column, or all rules. Idempotent.
    pub fn clear_rules(&self, column: Option<&str>) {
        self.engine.clear_rules(column);
    }

    /// Validates one row. An out-of-range index is an operation fault and
    /// returns no results.
    pub fn validate_row(&self, index: usize) -> Vec<ValidationResult> {
        match self.row(index) {
            Some(row) => self.engine.validate_row(&row),
            None => {
                self.signals.error.emit(Fault::new(
                    "validate_row",
                    format!("row index {index} out of range"),
                ));
                Vec::new()
            }
        }
    }

    /// Validates every non-empty row in bounded batches.
    pub fn validate_all(&self) -> Vec<ValidationResult> {
        let rows = self.rows();
        self.engine.validate_all(&rows)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Creates one empty row wired into the auto-revalidation hook and
    /// the grid-level change relay.
    pub(crate) fn make_row(&self) -> Arc<Row> {
        let row = Arc::new(Row::new(&self.columns));

        let weak = Arc::downgrade(&row);
        let engine = self.engine.clone();
        let signals = self.signals.clone();
        row.cell_changed().connect(move |(column, value)| {
            let Some(row) = weak.upgrade() else {
                return;
            };
            if !is_special_name(column) && engine.has_rules(column) {
                if let Some(cell) = row.cell(column) {
                    engine.validate_cell(&cell, &row);
                }
            }
            signals.cell_changed.emit(CellChanged {
                row,
                column: column.clone(),
                value: value.clone(),
            });
        });

        row
    }
}
