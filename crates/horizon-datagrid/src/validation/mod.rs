//! Rule-based validation.
//!
//! Hosts register [`ValidationRule`]s per column; the [`ValidationEngine`]
//! evaluates them per cell, per row, or across the whole grid in bounded
//! batches. Failures land on the cells themselves and on the engine's
//! signals; only the construction boundary ever returns an error.

mod engine;
mod rule;

pub use engine::{RowValidation, VALIDATION_BATCH_SIZE, ValidationEngine, ValidationResult};
pub use rule::{ConditionFn, ValidateFn, ValidationRule};
