//! Runtime cell values.
//!
//! Cells hold untyped values; coercion to a column's declared type happens
//! lazily (export, sorting). `CellValue` is the type-erased container those
//! values live in.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;

/// Type-erased container for a cell's runtime value.
///
/// A cell accepts whatever the host writes; the column's declared type only
/// comes into play when the value is projected (typed getters, sort keys).
///
/// # Example
///
/// ```
/// use horizon_datagrid::CellValue;
///
/// let v = CellValue::from("Hello");
/// assert_eq!(v.as_str(), Some("Hello"));
/// assert!(CellValue::Null.is_blank());
/// assert!(CellValue::from("   ").is_blank());
/// ```
#[derive(Debug, Default)]
pub enum CellValue {
    /// No value.
    #[default]
    Null,
    /// String data.
    Text(String),
    /// Integer data.
    Int(i64),
    /// Floating point data.
    Float(f64),
    /// Boolean data.
    Bool(bool),
    /// Date-time data (no timezone; the grid does not interpret zones).
    DateTime(NaiveDateTime),
    /// Custom data (type-erased). Compared and cloned by pointer identity.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Clone for CellValue {
    fn clone(&self) -> Self {
        match self {
            CellValue::Null => CellValue::Null,
            CellValue::Text(s) => CellValue::Text(s.clone()),
            CellValue::Int(n) => CellValue::Int(*n),
            CellValue::Float(n) => CellValue::Float(*n),
            CellValue::Bool(b) => CellValue::Bool(*b),
            CellValue::DateTime(dt) => CellValue::DateTime(*dt),
            CellValue::Custom(any) => CellValue::Custom(any.clone()),
        }
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => a == b,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            (CellValue::Custom(a), CellValue::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl CellValue {
    /// Creates new custom data from any type.
    pub fn new_custom<T: Any + Send + Sync + 'static>(value: T) -> Self {
        CellValue::Custom(Arc::new(value))
    }

    /// Returns `true` if this is `CellValue::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns `true` if this value counts as blank for emptiness checks:
    /// null, or text whose trimmed form is empty.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Attempts to get the value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to get the value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CellValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the value as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            CellValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to get the value as a date-time.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Attempts to downcast custom data to the specified type.
    pub fn downcast<T: Any>(&self) -> Option<&T> {
        match self {
            CellValue::Custom(any) => any.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// The display form used by clipboard serialization and export.
    ///
    /// `Null` renders as the empty string; custom payloads render as a
    /// placeholder since the grid cannot see inside them.
    pub fn display_string(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Int(n) => n.to_string(),
            CellValue::Float(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Custom(_) => "<object>".to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

/// Parses trimmed text as an integer, tolerating a float spelling of a
/// whole number ("30.0").
pub(crate) fn parse_int(text: &str) -> Option<i64> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(n);
    }
    let f = text.parse::<f64>().ok()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Parses trimmed text as a float.
pub(crate) fn parse_float(text: &str) -> Option<f64> {
    text.parse::<f64>().ok()
}

/// Parses trimmed text as a boolean, accepting the textual yes/no variants
/// case-insensitively.
pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Parses trimmed text as a timezone-naive date-time.
///
/// Accepts the grid's own display form, RFC 3339-ish `T` separation, and a
/// bare date.
pub(crate) fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Int(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Int(n as i64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<f32> for CellValue {
    fn from(n: f32) -> Self {
        CellValue::Float(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl From<Option<String>> for CellValue {
    fn from(opt: Option<String>) -> Self {
        match opt {
            Some(s) => CellValue::Text(s),
            None => CellValue::Null,
        }
    }
}
