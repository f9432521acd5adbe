//! Authentication state machine using rust-fsm.
//!
//! The FSM makes the session lifecycle explicit instead of deriving it from
//! storage checks.
//!
//! ## State Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │    SignedOut    │ (initial)
//! └────────┬────────┘
//!          │ CredentialsSubmitted / ValidateCachedSession
//!          ▼
//! ┌─────────────────┐     ┌─────────────────┐
//! │ Authenticating  │     │   Validating    │
//! └────────┬────────┘     └────────┬────────┘
//!          │                       │
//!          │ AuthSucceeded         │ CachedCredentialsFound ──► VerifyingWithServer
//!          │ AuthFailed            │                                   │
//!          │                       │ NoCachedSession                   │ ServerAccepted / ServerRejected
//!          ▼                       ▼                                   ▼
//! ┌─────────────────┐          SignedOut                      SignedIn / SignedOut
//! │    SignedIn     │
//! └────────┬────────┘
//!          │ SignOutRequested
//!          ▼
//! ┌─────────────────┐
//! │   SigningOut    │ ── SignOutComplete ──► SignedOut
//! └─────────────────┘
//! ```

use rust_fsm::*;
use serde::{Deserialize, Serialize};

// Define the FSM using rust-fsm's declarative macro
// This generates a module `session_machine` with:
// - session_machine::State (enum)
// - session_machine::Input (enum)
// - session_machine::StateMachine (type alias)
// - session_machine::Impl (trait impl)
state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub session_machine(SignedOut)

    SignedOut => {
        CredentialsSubmitted => Authenticating,
        ValidateCachedSession => Validating
    },
    Authenticating => {
        AuthSucceeded => SignedIn,
        AuthFailed => SignedOut
    },
    Validating => {
        // Cached token + user exist - must verify with the server
        CachedCredentialsFound => VerifyingWithServer,
        // Nothing cached
        NoCachedSession => SignedOut
    },
    VerifyingWithServer => {
        // Server confirmed the token and returned the authoritative user
        ServerAccepted => SignedIn,
        // Server rejected the token (expired, revoked, ...)
        ServerRejected => SignedOut
    },
    SignedIn => {
        // A repeat status check re-validates from the top
        ValidateCachedSession => Validating,
        SignOutRequested => SigningOut
    },
    SigningOut => {
        SignOutComplete => SignedOut
    }
}

// Re-export the generated types with clearer names
pub use session_machine::Input as SessionMachineInput;
pub use session_machine::State as SessionMachineState;
pub use session_machine::StateMachine as SessionMachine;

/// Authentication state for external consumption.
///
/// Consumers observe exactly one of `SignedOut` / `SignedIn` once
/// `is_loading` is false; the transient states are opaque loading windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    /// Not signed in.
    SignedOut,
    /// Login or registration in flight.
    Authenticating,
    /// Reading cached credentials.
    Validating,
    /// Cached token found; profile fetch in flight to validate it.
    VerifyingWithServer,
    /// Signed in with a server-validated session.
    SignedIn,
    /// Sign-out in flight.
    SigningOut,
}

impl AuthState {
    /// Returns true if the user has a validated session (SignedIn only).
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::SignedIn)
    }

    /// Returns true if the state is a transient/in-progress state.
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            AuthState::Authenticating
                | AuthState::Validating
                | AuthState::VerifyingWithServer
                | AuthState::SigningOut
        )
    }
}

impl From<&SessionMachineState> for AuthState {
    fn from(state: &SessionMachineState) -> Self {
        match state {
            SessionMachineState::SignedOut => AuthState::SignedOut,
            SessionMachineState::Authenticating => AuthState::Authenticating,
            SessionMachineState::Validating => AuthState::Validating,
            SessionMachineState::VerifyingWithServer => AuthState::VerifyingWithServer,
            SessionMachineState::SignedIn => AuthState::SignedIn,
            SessionMachineState::SigningOut => AuthState::SigningOut,
        }
    }
}

/// Payload for auth state change events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStateChangedPayload {
    /// Current auth state.
    pub state: AuthState,
    /// User ID if signed in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// User email if available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
