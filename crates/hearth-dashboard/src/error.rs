//! Dashboard error types.

use thiserror::Error;

/// Error type for dashboard operations.
///
/// Resource fetch failures are absorbed into empty sections or fallbacks;
/// the only blocking condition is having no house to load at all.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DashboardError {
    /// No current house is selected.
    #[error("No current house selected")]
    NoCurrentHouse,
}

/// Result type alias using DashboardError.
pub type DashboardResult<T> = Result<T, DashboardError>;
