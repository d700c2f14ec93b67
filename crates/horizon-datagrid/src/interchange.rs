//! Import/export boundary.
//!
//! The engine persists nothing. Importers hand the grid either a
//! [`DataTable`] or a list of key/value records; exporters receive a
//! `DataTable` limited to the non-special columns in declaration order,
//! with values projected through each cell's typed getter and
//! `CellValue::Null` as the explicit missing marker.

use crate::grid::DataGrid;
use crate::model::{CellValue, VALID_ALERTS, is_special_name};

/// A plain table: column names plus one value vector per row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTable {
    /// Column names in declaration order.
    pub columns: Vec<String>,
    /// Row values, positionally matching `columns`.
    pub rows: Vec<Vec<CellValue>>,
}

impl DataTable {
    /// Creates an empty table with the given column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// The number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl DataGrid {
    /// Exports the grid's data rows.
    ///
    /// Non-special columns only, in declaration order; values projected
    /// through the typed getter; empty rows excluded.
    pub fn export(&self) -> DataTable {
        let columns = self.editable_columns();
        let names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

        let rows = self
            .rows()
            .iter()
            .filter(|row| !row.is_empty())
            .map(|row| {
                columns
                    .iter()
                    .map(|column| {
                        row.cell(column.name())
                            .map(|cell| cell.typed_value())
                            .unwrap_or(CellValue::Null)
                    })
                    .collect()
            })
            .collect();

        DataTable {
            columns: names,
            rows,
        }
    }

    /// Loads a table, replacing current data.
    ///
    /// Existing rows are cleared and reused in order; extra rows are
    /// appended past the configured floor as needed. Unknown and special
    /// column names are skipped. A full validation pass runs after the
    /// load.
    pub fn import_table(&self, table: &DataTable) -> Vec<crate::ValidationResult> {
        self.reset_rows();
        for (index, record) in table.rows.iter().enumerate() {
            while index >= self.row_count() {
                self.append_row();
            }
            let row = self.row(index).expect("row just ensured");
            for (name, value) in table.columns.iter().zip(record) {
                if is_special_name(name) {
                    continue;
                }
                row.set_value(name, value.clone());
            }
        }
        self.validate_all()
    }

    /// Loads a list of key/value records, replacing current data.
    ///
    /// Same skipping and validation behavior as [`import_table`].
    ///
    /// [`import_table`]: DataGrid::import_table
    pub fn import_records(
        &self,
        records: &[Vec<(String, CellValue)>],
    ) -> Vec<crate::ValidationResult> {
        self.reset_rows();
        for (index, record) in records.iter().enumerate() {
            while index >= self.row_count() {
                self.append_row();
            }
            let row = self.row(index).expect("row just ensured");
            for (name, value) in record {
                if is_special_name(name) {
                    continue;
                }
                row.set_value(name, value.clone());
            }
        }
        self.validate_all()
    }

    /// Blanks every row's data and validation state before a load.
    fn reset_rows(&self) {
        for row in self.rows() {
            row.clear_values();
            for cell in row.cells() {
                cell.set_validation_errors(Vec::new());
            }
            if let Some(alerts) = row.cell(VALID_ALERTS) {
                alerts.set_value(CellValue::Null);
            }
        }
    }
}
