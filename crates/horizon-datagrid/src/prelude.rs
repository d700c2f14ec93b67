//! Prelude module for Horizon DataGrid.
//!
//! This module re-exports the most commonly used types for convenient
//! importing:
//!
//! ```ignore
//! use horizon_datagrid::prelude::*;
//! ```

// ============================================================================
// Grid assembly
// ============================================================================

pub use crate::{DataGrid, GridConfig, GridError};

// ============================================================================
// Data model
// ============================================================================

pub use crate::{Cell, CellValue, Column, ColumnSpec, Row, ValueType};

// ============================================================================
// Validation
// ============================================================================

pub use crate::{ValidationEngine, ValidationResult, ValidationRule};

// ============================================================================
// Navigation and sorting
// ============================================================================

pub use crate::{GridNavigator, GridPosition, SortDirection};

// ============================================================================
// Signal/slot and property primitives
// ============================================================================

pub use horizon_datagrid_core::{Property, Signal};
