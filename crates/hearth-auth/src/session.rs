//! Session management with FSM-based state tracking.
//!
//! `SessionManager` owns the session bundle (token + user). Transient states
//! (authenticating, validating, signing out) live only in the FSM; the
//! bundle itself is persisted in the cache so a restart can resume with an
//! optimistic hint that is then validated against the server.

use crate::fsm::{AuthState, AuthStateChangedPayload, SessionMachine, SessionMachineInput};
use crate::{AuthError, AuthResult};
use hearth_api::RemoteApi;
use hearth_models::{LoginRequest, RegisterRequest, User};
use hearth_storage::CacheManager;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Callback type for auth state change notifications.
pub type AuthStateCallback = Box<dyn Fn(AuthStateChangedPayload) + Send + Sync>;

/// Session manager for authentication state.
///
/// Constructed with its collaborators injected; nothing here is a global.
/// At construction it installs the cross-cutting 401 hook on the API client:
/// any unauthorized response from any endpoint wipes the persisted session
/// bundle.
pub struct SessionManager {
    cache: Arc<CacheManager>,
    api: Arc<dyn RemoteApi>,
    /// Internal FSM for tracking auth state transitions.
    fsm: Mutex<SessionMachine>,
    /// Callbacks for state change notifications.
    state_callbacks: Mutex<Vec<AuthStateCallback>>,
}

impl SessionManager {
    /// Create a new session manager and wire the 401 wipe hook.
    pub fn new(cache: Arc<CacheManager>, api: Arc<dyn RemoteApi>) -> Self {
        let hook_cache = cache.clone();
        api.set_unauthorized_hook(Arc::new(move || {
            if let Err(e) = hook_cache.clear_session_bundle() {
                warn!(error = %e, "Failed to clear session bundle after 401");
            }
        }));

        Self {
            cache,
            api,
            fsm: Mutex::new(SessionMachine::new()),
            state_callbacks: Mutex::new(Vec::new()),
        }
    }

    /// Register a callback to be notified of auth state changes.
    ///
    /// Several collaborators listen (UI, the membership layer's sign-out
    /// reset), so callbacks accumulate rather than replace each other.
    pub fn add_state_callback(&self, callback: AuthStateCallback) {
        self.state_callbacks.lock().unwrap().push(callback);
    }

    /// Get the current auth state.
    pub fn auth_state(&self) -> AuthState {
        let fsm = self.fsm.lock().unwrap();
        AuthState::from(fsm.state())
    }

    /// Transition the FSM and notify the callback if the state changed.
    fn transition(&self, input: &SessionMachineInput) -> Result<AuthState, AuthError> {
        let mut fsm = self.fsm.lock().unwrap();
        let old_state = AuthState::from(fsm.state());

        fsm.consume(input).map_err(|_| {
            AuthError::InvalidStateTransition(format!(
                "Cannot apply {:?} in state {:?}",
                input,
                fsm.state()
            ))
        })?;

        let new_state = AuthState::from(fsm.state());
        drop(fsm);

        if old_state != new_state {
            debug!(
                old_state = ?old_state,
                new_state = ?new_state,
                "Auth state transition"
            );
            self.notify_state_change(&new_state);
        }

        Ok(new_state)
    }

    /// Notify registered callbacks of a state change.
    fn notify_state_change(&self, state: &AuthState) {
        let callbacks = self.state_callbacks.lock().unwrap();
        if callbacks.is_empty() {
            return;
        }

        let (user_id, email) = self
            .cache
            .get_user()
            .ok()
            .flatten()
            .map(|u| (Some(u.id), Some(u.email)))
            .unwrap_or((None, None));

        for callback in callbacks.iter() {
            callback(AuthStateChangedPayload {
                state: state.clone(),
                user_id: user_id.clone(),
                email: email.clone(),
            });
        }
    }

    /// Persist a fresh session bundle and arm the API client.
    fn adopt_session(&self, token: &str, user: &User) -> AuthResult<()> {
        self.api.set_access_token(Some(token.to_string()));
        self.cache.set_auth_token(token)?;
        self.cache.set_user(user)?;
        Ok(())
    }

    /// Login with email and password.
    ///
    /// FSM: SignedOut -> Authenticating -> (SignedIn | SignedOut).
    /// Failures propagate unchanged to the caller for user-facing display;
    /// there is no retry.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<User> {
        self.transition(&SessionMachineInput::CredentialsSubmitted)?;

        debug!(email = %email, "Attempting login");

        let response = self
            .api
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.transition(&SessionMachineInput::AuthFailed)?;
                return Err(AuthError::Api(e));
            }
        };

        self.adopt_session(&response.access_token, &response.user)?;
        self.transition(&SessionMachineInput::AuthSucceeded)?;

        info!(user_id = %response.user.id, "Login successful");
        Ok(response.user)
    }

    /// Register a new account.
    ///
    /// Same contract as [`login`](Self::login): success stores the session,
    /// failure leaves state unchanged and propagates.
    pub async fn register(&self, req: &RegisterRequest) -> AuthResult<User> {
        self.transition(&SessionMachineInput::CredentialsSubmitted)?;

        debug!(email = %req.email, "Attempting registration");

        let response = match self.api.register(req).await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Registration failed");
                self.transition(&SessionMachineInput::AuthFailed)?;
                return Err(AuthError::Api(e));
            }
        };

        self.adopt_session(&response.access_token, &response.user)?;
        self.transition(&SessionMachineInput::AuthSucceeded)?;

        info!(user_id = %response.user.id, "Registration successful");
        Ok(response.user)
    }

    /// Sign out.
    ///
    /// Best-effort: the remote call may fail, but local state never stays
    /// authenticated after a user-initiated sign-out. Never propagates an
    /// error.
    pub async fn logout(&self) {
        // If we're not in SignedIn the transition is a no-op; clear anyway
        let _ = self.transition(&SessionMachineInput::SignOutRequested);

        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Remote logout failed, clearing local session anyway");
        }

        if let Err(e) = self.cache.clear_session_bundle() {
            warn!(error = %e, "Failed to clear cached session bundle");
        }
        self.api.set_access_token(None);

        let _ = self.transition(&SessionMachineInput::SignOutComplete);

        info!("Signed out");
    }

    /// Validate the cached session on startup.
    ///
    /// The cached user is never trusted on its own: when a token is found,
    /// the profile is re-fetched and the **server's** user is adopted. On
    /// rejection the session is cleared exactly as a sign-out would.
    ///
    /// FSM: -> Validating -> CachedCredentialsFound -> VerifyingWithServer
    ///      -> (ServerAccepted -> SignedIn | ServerRejected -> SignedOut)
    ///
    /// Returns whether the session ended up authenticated. Never propagates
    /// an error: all failure paths resolve to a clean signed-out state.
    pub async fn check_auth_status(&self) -> bool {
        if self.transition(&SessionMachineInput::ValidateCachedSession).is_err() {
            // A login/logout is already in flight; report what we know.
            return self.auth_state().is_authenticated();
        }

        let token = self.cache.get_auth_token().ok().flatten();
        let user = self.cache.get_user().ok().flatten();

        let (token, cached_user) = match (token, user) {
            (Some(t), Some(u)) => (t, u),
            _ => {
                info!("No cached session found");
                // A half-written bundle is as good as none; drop the leftovers
                if let Err(e) = self.cache.clear_session_bundle() {
                    warn!(error = %e, "Failed to clear partial session bundle");
                }
                let _ = self.transition(&SessionMachineInput::NoCachedSession);
                return false;
            }
        };

        self.api.set_access_token(Some(token));
        if self
            .transition(&SessionMachineInput::CachedCredentialsFound)
            .is_err()
        {
            return false;
        }

        debug!(user_id = %cached_user.id, "Cached credentials found, verifying with server");

        match self.api.get_profile().await {
            Ok(server_user) => {
                // The server's copy wins over whatever was cached
                if let Err(e) = self.cache.set_user(&server_user) {
                    warn!(error = %e, "Failed to persist refreshed user profile");
                }
                let _ = self.transition(&SessionMachineInput::ServerAccepted);
                info!(user_id = %server_user.id, "Session validated with server");
                true
            }
            Err(e) => {
                warn!(
                    user_id = %cached_user.id,
                    error = %e,
                    "Session rejected by server, clearing"
                );
                if let Err(e) = self.cache.clear_session_bundle() {
                    warn!(error = %e, "Failed to clear rejected session bundle");
                }
                self.api.set_access_token(None);
                let _ = self.transition(&SessionMachineInput::ServerRejected);
                false
            }
        }
    }

    /// Get the current user, if a session bundle exists.
    pub fn current_user(&self) -> Option<User> {
        self.cache.get_user().ok().flatten()
    }
}
