//! Horizon DataGrid - a headless, embeddable data grid engine.
//!
//! The engine owns the row/column/cell data model, a rule-based validation
//! engine, a cursor-navigation state machine, a tab-delimited clipboard
//! codec, and a type-aware stable sort. It renders nothing, owns no focus
//! or input dispatch, and persists nothing: a presentation layer drives it
//! through the documented operations and subscribes to its signals.
//!
//! # Example
//!
//! ```
//! use horizon_datagrid::prelude::*;
//!
//! let grid = DataGrid::new(
//!     vec![
//!         ColumnSpec::new("Name", ValueType::Text),
//!         ColumnSpec::new("Age", ValueType::Integer),
//!     ],
//!     GridConfig { minimum_rows: 10 },
//! )?;
//!
//! grid.add_rule(ValidationRule::required("Name"));
//! grid.add_rule(ValidationRule::numeric_range("Age", 0.0, 150.0));
//!
//! grid.set_value(0, "Name", CellValue::from("Ada"));
//! grid.set_value(0, "Age", CellValue::Int(36));
//!
//! let results = grid.validate_all();
//! assert!(results.iter().all(|r| r.is_valid()));
//! # Ok::<(), horizon_datagrid::GridError>(())
//! ```

pub mod clipboard;
mod error;
mod grid;
mod interchange;
mod model;
mod navigation;
mod sort;
mod validation;

pub mod prelude;

pub use error::{Fault, GridError};
pub use grid::{CellChanged, DataGrid, GridConfig, GridSignals};
pub use interchange::DataTable;
pub use model::{
    Cell, CellChange, CellValue, Column, ColumnSpec, DELETE_ACTION, Row, VALID_ALERTS, ValueType,
    is_special_name,
};
pub use navigation::{CurrentCell, GridNavigator, GridPosition, NavigationChange};
pub use sort::{SortDirection, sort_rows};
pub use validation::{
    ConditionFn, RowValidation, VALIDATION_BATCH_SIZE, ValidateFn, ValidationEngine,
    ValidationResult, ValidationRule,
};
