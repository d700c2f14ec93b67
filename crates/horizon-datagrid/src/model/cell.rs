//! Cells: a single editable value slot within a row.
//!
//! A cell tracks its current value, the snapshot taken when editing
//! started, and the validation messages last written by the validation
//! engine. Value writes are change-detected and emit `value_changed`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use horizon_datagrid_core::{Property, ReadOnlyProperty, Signal};

use super::column::{Column, ValueType};
use super::value::{self, CellValue};

/// A single cell, keyed by its column.
///
/// # Editing lifecycle
///
/// ```
/// use horizon_datagrid::{Cell, CellValue, Column, ColumnSpec, ValueType};
/// use std::sync::Arc;
///
/// let column = Arc::new(Column::from_spec(ColumnSpec::new("Name", ValueType::Text)));
/// let cell = Cell::new(column);
///
/// cell.set_value(CellValue::from("Ada"));
/// cell.begin_editing();
/// cell.set_value(CellValue::from("Grace"));
/// assert!(cell.has_unsaved_changes());
///
/// cell.cancel();
/// assert_eq!(cell.value(), CellValue::from("Ada"));
/// assert!(!cell.has_unsaved_changes());
/// ```
pub struct Cell {
    column: Arc<Column>,
    value: Property<CellValue>,
    original_value: Property<CellValue>,
    editing: AtomicBool,
    validation_errors: Property<Vec<String>>,
    /// Emitted on every effective value write with the new value.
    pub value_changed: Signal<CellValue>,
}

impl Cell {
    /// Creates an empty cell for the given column.
    pub fn new(column: Arc<Column>) -> Self {
        Self {
            column,
            value: Property::new(CellValue::Null),
            original_value: Property::new(CellValue::Null),
            editing: AtomicBool::new(false),
            validation_errors: Property::new(Vec::new()),
            value_changed: Signal::new(),
        }
    }

    /// The owning column.
    pub fn column(&self) -> &Arc<Column> {
        &self.column
    }

    /// The owning column's name.
    pub fn column_name(&self) -> &str {
        self.column.name()
    }

    /// The current value.
    pub fn value(&self) -> CellValue {
        self.value.get()
    }

    /// The value snapshot taken when editing started.
    pub fn original_value(&self) -> ReadOnlyProperty<'_, CellValue> {
        ReadOnlyProperty::new(&self.original_value)
    }

    /// Writes a value. Emits `value_changed` when the value actually
    /// changed.
    pub fn set_value(&self, value: CellValue) {
        if self.value.set(value.clone()) {
            self.value_changed.emit(value);
        }
    }

    /// Whether the cell is currently in an editing session.
    pub fn is_editing(&self) -> bool {
        self.editing.load(Ordering::SeqCst)
    }

    /// Starts an editing session, snapshotting the current value.
    pub fn begin_editing(&self) {
        self.original_value.set_silent(self.value.get());
        self.editing.store(true, Ordering::SeqCst);
    }

    /// Folds the current value into the snapshot and ends the editing
    /// session.
    pub fn commit(&self) {
        self.original_value.set_silent(self.value.get());
        self.editing.store(false, Ordering::SeqCst);
    }

    /// Restores the value from the snapshot and ends the editing session.
    ///
    /// Validation errors are cleared when the rollback fully reverts the
    /// dirty state.
    pub fn cancel(&self) {
        let original = self.original_value.get();
        self.set_value(original.clone());
        self.editing.store(false, Ordering::SeqCst);
        if !values_differ(&self.value.get(), &original) {
            self.validation_errors.set(Vec::new());
        }
    }

    /// `true` while an editing session is active and the value differs
    /// from the snapshot. Strings compare by trimmed equality. Always
    /// `false` outside an editing session.
    pub fn has_unsaved_changes(&self) -> bool {
        if !self.is_editing() {
            return false;
        }
        values_differ(&self.value.get(), &self.original_value.get())
    }

    /// The validation messages last written by the validation engine.
    pub fn validation_errors(&self) -> Vec<String> {
        self.validation_errors.get()
    }

    /// Overwrites the validation messages. Called by the validation
    /// engine.
    pub fn set_validation_errors(&self, errors: Vec<String>) {
        self.validation_errors.set(errors);
    }

    /// `true` when at least one validation message is present.
    pub fn has_validation_error(&self) -> bool {
        self.validation_errors.with(|e| !e.is_empty())
    }

    /// The value coerced to the column's declared type.
    ///
    /// A value already matching the declared type passes through;
    /// otherwise the display form is trimmed and parsed. Blank or
    /// unparsable values coerce to `Null`.
    pub fn typed_value(&self) -> CellValue {
        coerce(&self.value.get(), self.column.value_type())
    }
}

/// Change test used by the editing state: trimmed equality for text,
/// `PartialEq` otherwise.
fn values_differ(a: &CellValue, b: &CellValue) -> bool {
    match (a, b) {
        (CellValue::Text(a), CellValue::Text(b)) => a.trim() != b.trim(),
        _ => a != b,
    }
}

/// Coerces a runtime value to a declared type, yielding `Null` for blank
/// or unparsable input.
pub(crate) fn coerce(value: &CellValue, ty: ValueType) -> CellValue {
    if value.is_blank() {
        return CellValue::Null;
    }
    match ty {
        ValueType::Text => CellValue::Text(value.display_string()),
        ValueType::Integer | ValueType::Long => match value {
            CellValue::Int(n) => CellValue::Int(*n),
            other => value::parse_int(other.display_string().trim())
                .map(CellValue::Int)
                .unwrap_or(CellValue::Null),
        },
        ValueType::Decimal | ValueType::Float => match value {
            CellValue::Float(n) => CellValue::Float(*n),
            CellValue::Int(n) => CellValue::Float(*n as f64),
            other => value::parse_float(other.display_string().trim())
                .map(CellValue::Float)
                .unwrap_or(CellValue::Null),
        },
        ValueType::Boolean => match value {
            CellValue::Bool(b) => CellValue::Bool(*b),
            other => value::parse_bool(other.display_string().trim())
                .map(CellValue::Bool)
                .unwrap_or(CellValue::Null),
        },
        ValueType::DateTime => match value {
            CellValue::DateTime(dt) => CellValue::DateTime(*dt),
            other => value::parse_datetime(other.display_string().trim())
                .map(CellValue::DateTime)
                .unwrap_or(CellValue::Null),
        },
        ValueType::Object => value.clone(),
    }
}
