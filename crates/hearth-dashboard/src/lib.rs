//! Dashboard data loading for the Hearth client.
//!
//! The main screen needs house detail, balances, the shopping list and the
//! recent ledger in a single load. The loader fans those fetches out
//! concurrently and degrades per resource: a failed section comes back
//! empty (or falls back to known data) instead of failing the screen.

mod error;
mod loader;

pub use error::{DashboardError, DashboardResult};
pub use loader::{ActivityEntry, DashboardData, DashboardLoader};
