//! House membership synchronization for the Hearth client.
//!
//! This crate owns the set of houses the user belongs to and the single
//! "current house" selection, reconciling the persistent cache against the
//! server. Cached data passes a trust gate (every entry must carry the
//! user's own membership record) before it is ever surfaced, and a server
//! refresh is issued unconditionally afterwards: the cache is advisory,
//! never authoritative.

mod error;
mod set;
mod sync;

pub use error::{MembershipError, MembershipResult};
pub use set::MembershipSet;
pub use sync::{MembershipCache, SyncState};
