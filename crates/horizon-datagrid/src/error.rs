//! Error types for the grid engine.
//!
//! Only structural faults at construction time surface as `Result` errors.
//! Everything else is reported through per-component error signals
//! carrying a [`Fault`], and the failing method returns a safe default.

/// Errors raised at the construction boundary.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The grid was initialized without any columns.
    #[error("grid requires at least one column")]
    NoColumns,

    /// Two columns were declared with the same name.
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),
}

/// Payload of a component's error signal.
///
/// Carried instead of a propagated panic/exception: the operation that
/// failed plus a human-readable cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// Tag of the operation that failed (e.g. `"paste"`, `"validate_all"`).
    pub operation: &'static str,
    /// Human-readable cause.
    pub message: String,
}

impl Fault {
    /// Creates a fault report for the given operation.
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.operation, self.message)
    }
}
