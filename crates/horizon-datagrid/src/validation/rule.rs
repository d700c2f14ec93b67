//! Validation rules and the declarative builders hosts assemble them from.

use std::sync::Arc;

use crate::model::{CellValue, Row};

/// Type alias for a rule predicate.
///
/// Returns `true` when the value is acceptable for the row.
pub type ValidateFn = Arc<dyn Fn(&CellValue, &Row) -> bool + Send + Sync>;

/// Type alias for a rule's apply-condition.
///
/// Returns `true` when the rule should fire for the row at all.
pub type ConditionFn = Arc<dyn Fn(&Row) -> bool + Send + Sync>;

/// A single validation rule targeting one column.
///
/// Identity is `(column_name, rule_name)`; registering a rule under an
/// existing name replaces it. Higher `priority` evaluates first; rules of
/// equal priority keep registration order.
///
/// # Example
///
/// ```
/// use horizon_datagrid::ValidationRule;
///
/// // Salary must be at least 3000, but only for rows where Age > 50.
/// let rule = ValidationRule::new("Salary", "senior-minimum", "Salary must be at least 3000",
///     |value, _row| value.as_int().is_none_or(|n| n >= 3000))
///     .when_value("Age", |age| age.as_int().is_some_and(|n| n > 50))
///     .with_priority(5);
/// assert_eq!(rule.rule_name(), "senior-minimum");
/// ```
pub struct ValidationRule {
    column_name: String,
    rule_name: String,
    error_message: String,
    priority: i32,
    validate: ValidateFn,
    apply_condition: Option<ConditionFn>,
}

impl Clone for ValidationRule {
    fn clone(&self) -> Self {
        Self {
            column_name: self.column_name.clone(),
            rule_name: self.rule_name.clone(),
            error_message: self.error_message.clone(),
            priority: self.priority,
            validate: self.validate.clone(),
            apply_condition: self.apply_condition.clone(),
        }
    }
}

impl ValidationRule {
    /// Creates a rule with default priority 0 and no apply-condition.
    pub fn new<F>(
        column: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
        validate: F,
    ) -> Self
    where
        F: Fn(&CellValue, &Row) -> bool + Send + Sync + 'static,
    {
        Self {
            column_name: column.into(),
            rule_name: name.into(),
            error_message: message.into(),
            priority: 0,
            validate: Arc::new(validate),
            apply_condition: None,
        }
    }

    /// Sets the evaluation priority (higher runs first).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Gates the rule on a row-level condition.
    pub fn when<F>(mut self, condition: F) -> Self
    where
        F: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        self.apply_condition = Some(Arc::new(condition));
        self
    }

    /// Gates the rule on another column's value in the same row.
    ///
    /// A missing column reads as `CellValue::Null`.
    pub fn when_value<F>(self, column: impl Into<String>, condition: F) -> Self
    where
        F: Fn(&CellValue) -> bool + Send + Sync + 'static,
    {
        let column = column.into();
        self.when(move |row| {
            let value = row.cell(&column).map(|c| c.value()).unwrap_or_default();
            condition(&value)
        })
    }

    /// The target column's name.
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// The rule's unique-per-column name.
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    /// The message reported when the rule fails.
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// The evaluation priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Evaluates the apply-condition for a row (default: always true).
    pub fn applies_to(&self, row: &Row) -> bool {
        match &self.apply_condition {
            Some(condition) => condition(row),
            None => true,
        }
    }

    /// Evaluates the predicate.
    pub fn check(&self, value: &CellValue, row: &Row) -> bool {
        (self.validate)(value, row)
    }

    // -------------------------------------------------------------------------
    // Declarative builders
    // -------------------------------------------------------------------------

    /// The column must hold a non-blank value.
    pub fn required(column: impl Into<String>) -> Self {
        let column = column.into();
        let message = format!("{column} is required");
        Self::new(column, "required", message, |value, _row| !value.is_blank())
    }

    /// The column, when non-blank, must parse as a number within
    /// `[min, max]`.
    pub fn numeric_range(column: impl Into<String>, min: f64, max: f64) -> Self {
        let column = column.into();
        let message = format!("{column} must be between {min} and {max}");
        Self::new(column, "numeric-range", message, move |value, _row| {
            if value.is_blank() {
                return true;
            }
            match numeric(value) {
                Some(n) => n >= min && n <= max,
                None => false,
            }
        })
    }

    /// The column's trimmed text length must lie within `[min, max]`.
    pub fn length_bounds(column: impl Into<String>, min: usize, max: usize) -> Self {
        let column = column.into();
        let message = format!("{column} must be {min} to {max} characters");
        Self::new(column, "length-bounds", message, move |value, _row| {
            let len = value.display_string().trim().chars().count();
            len >= min && len <= max
        })
    }
}

fn numeric(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Int(n) => Some(*n as f64),
        CellValue::Float(n) => Some(*n),
        other => other.display_string().trim().parse::<f64>().ok(),
    }
}

impl std::fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationRule")
            .field("column_name", &self.column_name)
            .field("rule_name", &self.rule_name)
            .field("priority", &self.priority)
            .field("conditional", &self.apply_condition.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, ColumnSpec, ValueType};

    fn row() -> Row {
        let columns = vec![
            Arc::new(Column::from_spec(ColumnSpec::new(
                "Age",
                ValueType::Integer,
            ))),
            Arc::new(Column::from_spec(ColumnSpec::new(
                "Salary",
                ValueType::Decimal,
            ))),
        ];
        Row::new(&columns)
    }

    #[test]
    fn test_required() {
        let rule = ValidationRule::required("Age");
        let row = row();
        assert!(!rule.check(&CellValue::Null, &row));
        assert!(!rule.check(&CellValue::from("  "), &row));
        assert!(rule.check(&CellValue::Int(1), &row));
        assert_eq!(rule.error_message(), "Age is required");
    }

    #[test]
    fn test_numeric_range() {
        let rule = ValidationRule::numeric_range("Age", 18.0, 65.0);
        let row = row();
        assert!(rule.check(&CellValue::Int(30), &row));
        assert!(rule.check(&CellValue::from("42"), &row));
        assert!(!rule.check(&CellValue::Int(17), &row));
        assert!(!rule.check(&CellValue::from("not a number"), &row));
        // Blank is range-acceptable; `required` owns presence
        assert!(rule.check(&CellValue::Null, &row));
    }

    #[test]
    fn test_length_bounds() {
        let rule = ValidationRule::length_bounds("Name", 2, 4);
        let row = row();
        assert!(rule.check(&CellValue::from("ab"), &row));
        assert!(rule.check(&CellValue::from(" abcd "), &row));
        assert!(!rule.check(&CellValue::from("a"), &row));
        assert!(!rule.check(&CellValue::from("abcde"), &row));
    }

    #[test]
    fn test_when_value_condition() {
        let rule = ValidationRule::new("Salary", "senior-minimum", "too low", |value, _| {
            value.as_int().is_none_or(|n| n >= 3000)
        })
        .when_value("Age", |age| age.as_int().is_some_and(|n| n > 50));

        let row = row();
        row.set_value("Age", CellValue::Int(40));
        assert!(!rule.applies_to(&row));

        row.set_value("Age", CellValue::Int(55));
        assert!(rule.applies_to(&row));
    }

    #[test]
    fn test_when_value_missing_column_reads_null() {
        let rule = ValidationRule::new("Salary", "x", "m", |_, _| true)
            .when_value("Nonexistent", |v| v.is_null());
        assert!(rule.applies_to(&row()));
    }
}
