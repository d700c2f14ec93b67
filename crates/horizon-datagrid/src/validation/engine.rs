//! The validation engine: rule registry and cell/row/batch evaluation.
//!
//! A misbehaving rule must never take the grid down: a panicking predicate
//! or condition is contained to that one rule, which simply counts as
//! failed. Faults anywhere else in the batch pipeline surface on the
//! engine's error signal and the call returns whatever was computed.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use horizon_datagrid_core::Signal;
use parking_lot::RwLock;
use rayon::prelude::*;

use super::rule::ValidationRule;
use crate::error::Fault;
use crate::model::{Cell, Row, VALID_ALERTS};

/// Rows validated concurrently within one batch of `validate_all`.
///
/// Bounds peak concurrent work without serializing the grid: a full batch
/// is joined before the next one starts.
pub const VALIDATION_BATCH_SIZE: usize = 10;

/// The outcome of validating one cell.
///
/// Ephemeral: produced per validation call, not persisted (the durable
/// state lives on the cell itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// The validated column's name.
    pub column_name: String,
    /// Failure messages in evaluation order (priority-descending).
    pub error_messages: Vec<String>,
}

impl ValidationResult {
    /// `true` when no rule failed.
    pub fn is_valid(&self) -> bool {
        self.error_messages.is_empty()
    }
}

/// Payload of [`ValidationEngine::row_validated`].
#[derive(Clone)]
pub struct RowValidation {
    /// The validated row.
    pub row: Arc<Row>,
    /// One result per evaluated cell.
    pub results: Vec<ValidationResult>,
}

/// Rule registry plus cell/row/batch evaluation.
pub struct ValidationEngine {
    /// Per-column rules in registration order.
    rules: RwLock<HashMap<String, Vec<ValidationRule>>>,
    /// Emitted after each `validate_row` completes.
    pub row_validated: Signal<RowValidation>,
    /// Error channel for faults outside single-rule evaluation.
    pub error: Signal<Fault>,
    /// Guard against overlapping `validate_all` calls.
    validating: AtomicBool,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationEngine {
    /// Creates an engine with no rules registered.
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(HashMap::new()),
            row_validated: Signal::new(),
            error: Signal::new(),
            validating: AtomicBool::new(false),
        }
    }

    // -------------------------------------------------------------------------
    // Rule management
    // -------------------------------------------------------------------------

    /// Registers a rule. Re-adding a `(column, name)` identity replaces the
    /// existing rule in place, keeping its registration position.
    pub fn add_rule(&self, rule: ValidationRule) {
        let mut rules = self.rules.write();
        let column_rules = rules.entry(rule.column_name().to_string()).or_default();
        match column_rules
            .iter_mut()
            .find(|r| r.rule_name() == rule.rule_name())
        {
            Some(existing) => *existing = rule,
            None => column_rules.push(rule),
        }
    }

    /// Removes a rule by identity. Idempotent; returns whether a rule was
    /// removed.
    pub fn remove_rule(&self, column: &str, name: &str) -> bool {
        let mut rules = self.rules.write();
        let Some(column_rules) = rules.get_mut(column) else {
            return false;
        };
        let before = column_rules.len();
        column_rules.retain(|r| r.rule_name() != name);
        before != column_rules.len()
    }

    /// Removes all rules for one column, or every rule when `column` is
    /// `None`. Idempotent.
    pub fn clear_rules(&self, column: Option<&str>) {
        let mut rules = self.rules.write();
        match column {
            Some(column) => {
                rules.remove(column);
            }
            None => rules.clear(),
        }
    }

    /// Whether any rule targets the given column.
    pub fn has_rules(&self, column: &str) -> bool {
        self.rules.read().get(column).is_some_and(|r| !r.is_empty())
    }

    // -------------------------------------------------------------------------
    // Evaluation
    // -------------------------------------------------------------------------

    /// Validates one cell against its column's applicable rules.
    ///
    /// Rules whose apply-condition holds are evaluated in
    /// priority-descending order (registration order among equals). Every
    /// applicable rule is evaluated; messages are collected, written back
    /// onto the cell, and returned.
    pub fn validate_cell(&self, cell: &Cell, row: &Row) -> ValidationResult {
        let column_name = cell.column_name().to_string();

        // Snapshot outside the lock: a rule closure may re-enter the
        // registry (add/remove rules) without deadlocking.
        let mut rules: Vec<ValidationRule> = self
            .rules
            .read()
            .get(&column_name)
            .map(|r| r.to_vec())
            .unwrap_or_default();
        rules.sort_by_key(|r| std::cmp::Reverse(r.priority()));

        let value = cell.value();
        let mut messages = Vec::new();
        for rule in &rules {
            // A panicking condition counts as the rule failing, same as a
            // panicking predicate.
            let applies = catch_unwind(AssertUnwindSafe(|| rule.applies_to(row)));
            let passed = match applies {
                Ok(false) => continue,
                Ok(true) => {
                    catch_unwind(AssertUnwindSafe(|| rule.check(&value, row))).unwrap_or(false)
                }
                Err(_) => false,
            };
            if !passed {
                tracing::debug!(
                    target: "horizon_datagrid::validation",
                    column = %column_name,
                    rule = %rule.rule_name(),
                    "rule failed"
                );
                messages.push(rule.error_message().to_string());
            }
        }

        cell.set_validation_errors(messages.clone());
        ValidationResult {
            column_name,
            error_messages: messages,
        }
    }

    /// Validates every non-special cell of the row that has at least one
    /// registered rule, refreshes the row's `ValidAlerts` projection, and
    /// emits `row_validated`.
    pub fn validate_row(&self, row: &Arc<Row>) -> Vec<ValidationResult> {
        let mut results = Vec::new();
        for cell in row.cells() {
            if cell.column().is_special() || !self.has_rules(cell.column_name()) {
                continue;
            }
            results.push(self.validate_cell(&cell, row));
        }

        if let Some(alerts) = row.cell(VALID_ALERTS) {
            alerts.set_value(row.validation_errors_text().into());
        }

        self.row_validated.emit(RowValidation {
            row: row.clone(),
            results: results.clone(),
        });
        results
    }

    /// Validates all non-empty rows in batches of
    /// [`VALIDATION_BATCH_SIZE`], rows within a batch concurrently.
    ///
    /// A second call while one is in flight is rejected: it reports on the
    /// error signal and returns no results. A fault inside the batch
    /// pipeline is reported the same way and the partial results computed
    /// so far are returned.
    pub fn validate_all(&self, rows: &[Arc<Row>]) -> Vec<ValidationResult> {
        if self.validating.swap(true, Ordering::SeqCst) {
            self.error.emit(Fault::new(
                "validate_all",
                "a full-grid validation is already in flight",
            ));
            return Vec::new();
        }
        let _guard = ValidatingGuard(&self.validating);

        let non_empty: Vec<&Arc<Row>> = rows.iter().filter(|r| !r.is_empty()).collect();
        tracing::debug!(
            target: "horizon_datagrid::validation",
            rows = non_empty.len(),
            batch_size = VALIDATION_BATCH_SIZE,
            "starting full validation"
        );

        let mut results = Vec::new();
        for batch in non_empty.chunks(VALIDATION_BATCH_SIZE) {
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                batch
                    .par_iter()
                    .map(|row| self.validate_row(row))
                    .collect::<Vec<_>>()
            }));
            match outcome {
                Ok(batch_results) => {
                    results.extend(batch_results.into_iter().flatten());
                }
                Err(_) => {
                    self.error.emit(Fault::new(
                        "validate_all",
                        "validation batch panicked; returning partial results",
                    ));
                    return results;
                }
            }
        }
        results
    }
}

/// Clears the in-flight flag even when the batch pipeline panics through.
struct ValidatingGuard<'a>(&'a AtomicBool);

impl Drop for ValidatingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, Column, ColumnSpec, ValueType};
    use parking_lot::Mutex;

    fn columns() -> Vec<Arc<Column>> {
        vec![
            Arc::new(Column::from_spec(ColumnSpec::new(
                "Age",
                ValueType::Integer,
            ))),
            Arc::new(Column::from_spec(ColumnSpec::new(
                "Salary",
                ValueType::Decimal,
            ))),
            Arc::new(Column::from_spec(ColumnSpec::new(
                VALID_ALERTS,
                ValueType::Text,
            ))),
        ]
    }

    fn row() -> Arc<Row> {
        Arc::new(Row::new(&columns()))
    }

    #[test]
    fn test_validate_cell_collects_all_failures() {
        let engine = ValidationEngine::new();
        engine.add_rule(ValidationRule::required("Age"));
        engine.add_rule(ValidationRule::numeric_range("Age", 18.0, 65.0));

        let row = row();
        let cell = row.cell("Age").unwrap();
        cell.set_value(CellValue::from("not a number"));

        let result = engine.validate_cell(&cell, &row);
        assert!(!result.is_valid());
        // required passes (non-blank), range fails
        assert_eq!(result.error_messages.len(), 1);
        assert!(cell.has_validation_error());
        assert_eq!(cell.validation_errors(), result.error_messages);
    }

    #[test]
    fn test_priority_orders_messages() {
        let engine = ValidationEngine::new();
        engine.add_rule(
            ValidationRule::new("Age", "low", "low priority message", |_, _| false)
                .with_priority(1),
        );
        engine.add_rule(
            ValidationRule::new("Age", "high", "high priority message", |_, _| false)
                .with_priority(5),
        );

        let row = row();
        let cell = row.cell("Age").unwrap();
        cell.set_value(CellValue::Int(1));

        let result = engine.validate_cell(&cell, &row);
        assert_eq!(
            result.error_messages,
            vec!["high priority message", "low priority message"]
        );
    }

    #[test]
    fn test_equal_priority_keeps_registration_order() {
        let engine = ValidationEngine::new();
        engine.add_rule(ValidationRule::new("Age", "first", "first", |_, _| false));
        engine.add_rule(ValidationRule::new("Age", "second", "second", |_, _| false));

        let row = row();
        let cell = row.cell("Age").unwrap();
        cell.set_value(CellValue::Int(1));

        let result = engine.validate_cell(&cell, &row);
        assert_eq!(result.error_messages, vec!["first", "second"]);
    }

    #[test]
    fn test_conditional_rule_gating() {
        let engine = ValidationEngine::new();
        engine.add_rule(
            ValidationRule::new("Salary", "senior-minimum", "Salary must be >= 3000", |v, _| {
                v.as_int().is_none_or(|n| n >= 3000)
            })
            .when_value("Age", |age| age.as_int().is_some_and(|n| n > 50)),
        );

        let row = row();
        row.set_value("Age", CellValue::Int(40));
        row.set_value("Salary", CellValue::Int(1000));
        let cell = row.cell("Salary").unwrap();

        let result = engine.validate_cell(&cell, &row);
        assert!(result.is_valid());
        assert!(!cell.has_validation_error());

        row.set_value("Age", CellValue::Int(55));
        let result = engine.validate_cell(&cell, &row);
        assert!(!result.is_valid());
        assert!(cell.has_validation_error());
    }

    #[test]
    fn test_panicking_predicate_degrades_to_failure() {
        let engine = ValidationEngine::new();
        engine.add_rule(ValidationRule::new(
            "Age",
            "broken",
            "broken rule",
            |_, _| panic!("rule bug"),
        ));
        engine.add_rule(ValidationRule::new("Age", "fine", "never fails", |_, _| {
            true
        }));

        let row = row();
        let cell = row.cell("Age").unwrap();
        cell.set_value(CellValue::Int(1));

        let result = engine.validate_cell(&cell, &row);
        assert_eq!(result.error_messages, vec!["broken rule"]);
    }

    #[test]
    fn test_re_add_replaces_in_place() {
        let engine = ValidationEngine::new();
        engine.add_rule(ValidationRule::new("Age", "a", "old a", |_, _| false));
        engine.add_rule(ValidationRule::new("Age", "b", "b", |_, _| false));
        engine.add_rule(ValidationRule::new("Age", "a", "new a", |_, _| false));

        let row = row();
        let cell = row.cell("Age").unwrap();
        cell.set_value(CellValue::Int(1));

        let result = engine.validate_cell(&cell, &row);
        assert_eq!(result.error_messages, vec!["new a", "b"]);
    }

    #[test]
    fn test_rule_management_idempotent() {
        let engine = ValidationEngine::new();
        engine.add_rule(ValidationRule::required("Age"));
        assert!(engine.has_rules("Age"));

        assert!(engine.remove_rule("Age", "required"));
        assert!(!engine.remove_rule("Age", "required"));
        assert!(!engine.has_rules("Age"));

        engine.clear_rules(Some("Age"));
        engine.clear_rules(None);
    }

    #[test]
    fn test_validate_row_updates_alerts_projection() {
        let engine = ValidationEngine::new();
        engine.add_rule(ValidationRule::required("Age"));

        let row = row();
        row.set_value("Salary", CellValue::Int(100)); // row non-empty, Age blank
        let results = engine.validate_row(&row);

        assert_eq!(results.len(), 1);
        assert!(!results[0].is_valid());
        assert_eq!(
            row.cell(VALID_ALERTS).unwrap().value(),
            CellValue::from("Age: Age is required")
        );

        // Fixing the value clears the projection on the next pass
        row.set_value("Age", CellValue::Int(30));
        engine.validate_row(&row);
        assert_eq!(
            row.cell(VALID_ALERTS).unwrap().value(),
            CellValue::from("")
        );
    }

    #[test]
    fn test_validate_all_skips_empty_rows() {
        let engine = ValidationEngine::new();
        engine.add_rule(ValidationRule::required("Age"));

        let rows: Vec<Arc<Row>> = (0..25).map(|_| row()).collect();
        // Only rows 3 and 7 are non-empty
        rows[3].set_value("Salary", CellValue::Int(1));
        rows[7].set_value("Salary", CellValue::Int(2));

        let results = engine.validate_all(&rows);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.is_valid()));
    }

    #[test]
    fn test_validate_all_emits_row_validated() {
        let engine = ValidationEngine::new();
        engine.add_rule(ValidationRule::required("Age"));

        let rows: Vec<Arc<Row>> = (0..3).map(|_| row()).collect();
        for r in &rows {
            r.set_value("Age", CellValue::Int(1));
        }

        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();
        engine.row_validated.connect(move |validation| {
            assert!(validation.results.iter().all(|r| r.is_valid()));
            *count_clone.lock() += 1;
        });

        engine.validate_all(&rows);
        assert_eq!(*count.lock(), 3);
    }

    #[test]
    fn test_validate_all_rejects_reentry() {
        let engine = Arc::new(ValidationEngine::new());
        let faults = Arc::new(Mutex::new(Vec::new()));
        let faults_clone = faults.clone();
        engine.error.connect(move |fault| {
            faults_clone.lock().push(fault.clone());
        });

        // Re-enter from within a rule evaluated by validate_all
        let engine_clone = engine.clone();
        engine.add_rule(ValidationRule::new("Age", "reenter", "x", move |_, _| {
            let nested = engine_clone.validate_all(&[]);
            assert!(nested.is_empty());
            true
        }));

        let row = row();
        row.set_value("Age", CellValue::Int(1));
        let results = engine.validate_all(&[row]);

        assert_eq!(results.len(), 1);
        let faults = faults.lock();
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].operation, "validate_all");
    }
}
