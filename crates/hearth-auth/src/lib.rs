//! Authentication for the Hearth client.
//!
//! This crate provides:
//! - An explicit FSM for authentication state (login, register, cached
//!   session validation, sign-out)
//! - [`SessionManager`], which owns the session bundle and mediates between
//!   the persistent cache and the backend
//! - The validate-before-trust policy: cached credentials are a hint for
//!   optimistic UI, never a final answer

mod error;
mod fsm;
mod session;

pub use error::{AuthError, AuthResult};
pub use fsm::session_machine;
pub use fsm::{AuthState, AuthStateChangedPayload, SessionMachine, SessionMachineInput, SessionMachineState};
pub use session::{AuthStateCallback, SessionManager};
