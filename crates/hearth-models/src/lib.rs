//! Domain and wire types shared across the Hearth client core.
//!
//! These types mirror the JSON payloads produced by the backend. They carry
//! no behavior beyond small accessors; all mutation happens in the owning
//! components (`hearth-auth`, `hearth-membership`).

mod house;
mod resources;
mod user;

pub use house::{House, HousePatch, HouseRole, Membership, NewHouse};
pub use resources::{Balance, Expense, Payment, ShoppingItem};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, User};
