//! Logging facilities for Horizon DataGrid.
//!
//! The engine is instrumented with the `tracing` crate under the stable
//! targets listed in [`targets`]. Nothing in the engine reads an ambient
//! debug flag: verbosity is process-wide configuration installed explicitly
//! by the host, once, through a `tracing` subscriber, and filtering is done
//! per subsystem target.
//!
//! To see logs, install a subscriber in your application before creating
//! grids:
//!
//! ```ignore
//! use tracing_subscriber::EnvFilter;
//!
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter(
//!             EnvFilter::new("horizon_datagrid=info,horizon_datagrid::validation=debug"),
//!         )
//!         .init();
//!
//!     // Your application code...
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core primitives target.
    pub const CORE: &str = "horizon_datagrid_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_datagrid_core::signal";
    /// Grid orchestration target.
    pub const GRID: &str = "horizon_datagrid::grid";
    /// Validation engine target.
    pub const VALIDATION: &str = "horizon_datagrid::validation";
    /// Navigation engine target.
    pub const NAVIGATION: &str = "horizon_datagrid::navigation";
    /// Sort engine target.
    pub const SORT: &str = "horizon_datagrid::sort";
}
