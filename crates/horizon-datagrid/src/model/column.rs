//! Column declarations and runtime column state.
//!
//! Columns are created once during grid initialization from a
//! caller-supplied list of [`ColumnSpec`]s and are immutable afterwards,
//! except for display width, which is cosmetic.

use horizon_datagrid_core::Property;
use serde::{Deserialize, Serialize};

/// Reserved column name for the per-row delete control.
pub const DELETE_ACTION: &str = "DeleteAction";

/// Reserved column name for the per-row validation summary.
pub const VALID_ALERTS: &str = "ValidAlerts";

/// The declared value type of a column.
///
/// The declared type does not constrain what a cell stores; it directs
/// coercion when values are projected (typed getters, sort keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    /// Free-form text.
    #[default]
    Text,
    /// 32-bit-range integer.
    Integer,
    /// Fixed-point decimal (compared as f64).
    Decimal,
    /// Floating point.
    Float,
    /// 64-bit integer.
    Long,
    /// Boolean; textual yes/no variants are accepted on coercion.
    Boolean,
    /// Date and time, timezone-naive.
    DateTime,
    /// Opaque payload; stringified for comparison.
    Object,
}

/// A plain column declaration as supplied by the host.
///
/// `ColumnSpec` is serde-derived so hosts can keep grid layouts in
/// configuration files.
///
/// # Example
///
/// ```
/// use horizon_datagrid::{ColumnSpec, ValueType};
///
/// let spec = ColumnSpec::new("Age", ValueType::Integer)
///     .with_width(40.0, 80.0)
///     .sortable(true);
/// assert_eq!(spec.name, "Age");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Unique column name.
    pub name: String,
    /// Declared value type.
    #[serde(default)]
    pub value_type: ValueType,
    /// Minimum display width.
    #[serde(default = "default_min_width")]
    pub min_width: f32,
    /// Maximum display width.
    #[serde(default = "default_max_width")]
    pub max_width: f32,
    /// Whether the presentation layer may resize the column.
    #[serde(default = "default_true")]
    pub resizable: bool,
    /// Whether the column participates in sorting.
    #[serde(default = "default_true")]
    pub sortable: bool,
    /// Whether the presentation layer should refuse edits.
    #[serde(default)]
    pub read_only: bool,
}

fn default_min_width() -> f32 {
    40.0
}

fn default_max_width() -> f32 {
    300.0
}

fn default_true() -> bool {
    true
}

impl ColumnSpec {
    /// Creates a declaration with default layout attributes.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            min_width: default_min_width(),
            max_width: default_max_width(),
            resizable: true,
            sortable: true,
            read_only: false,
        }
    }

    /// Sets the width bounds.
    pub fn with_width(mut self, min: f32, max: f32) -> Self {
        self.min_width = min;
        self.max_width = max;
        self
    }

    /// Sets the resizable flag.
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Sets the sortable flag.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Sets the read-only flag.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// Runtime column state.
///
/// Identity is the unique `name`. Everything but the current width is
/// fixed at construction.
#[derive(Debug)]
pub struct Column {
    name: String,
    value_type: ValueType,
    min_width: f32,
    max_width: f32,
    resizable: bool,
    sortable: bool,
    read_only: bool,
    /// Current display width; cosmetic, mutable.
    width: Property<f32>,
}

impl Column {
    /// Builds the runtime column from its declaration.
    pub fn from_spec(spec: ColumnSpec) -> Self {
        let width = spec.min_width;
        Self {
            name: spec.name,
            value_type: spec.value_type,
            min_width: spec.min_width,
            max_width: spec.max_width,
            resizable: spec.resizable,
            sortable: spec.sortable,
            read_only: spec.read_only,
            width: Property::new(width),
        }
    }

    /// The unique column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared value type.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Minimum display width.
    pub fn min_width(&self) -> f32 {
        self.min_width
    }

    /// Maximum display width.
    pub fn max_width(&self) -> f32 {
        self.max_width
    }

    /// Whether the presentation layer may resize the column.
    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    /// Whether the column participates in sorting.
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Whether the presentation layer should refuse edits.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// The current display width.
    pub fn width(&self) -> f32 {
        self.width.get()
    }

    /// Sets the display width, clamped to the declared bounds. No-op when
    /// the column is not resizable.
    pub fn set_width(&self, width: f32) {
        if !self.resizable {
            return;
        }
        self.width.set(width.clamp(self.min_width, self.max_width));
    }

    /// `true` for the two reserved names (`DeleteAction`, `ValidAlerts`),
    /// which participate in layout but never in validation, export,
    /// emptiness checks, or sorting keys.
    pub fn is_special(&self) -> bool {
        is_special_name(&self.name)
    }
}

/// Whether a column name is one of the reserved, non-data names.
pub fn is_special_name(name: &str) -> bool {
    name == DELETE_ACTION || name == VALID_ALERTS
}
