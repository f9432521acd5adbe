//! The remote API seam.

use crate::{ApiError, ApiResult};
use async_trait::async_trait;
use hearth_models::{
    AuthResponse, Balance, Expense, House, HousePatch, LoginRequest, NewHouse, Payment,
    RegisterRequest, ShoppingItem, User,
};
use std::sync::Arc;

/// Callback fired whenever any remote call comes back with HTTP 401.
///
/// The session layer installs a hook that wipes the persisted session
/// bundle, so a revoked token can never survive in the cache.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// Client interface to the Hearth backend.
///
/// `HttpApi` is the production implementation; tests substitute in-memory
/// doubles the same way the storage layer does.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Set (or clear) the bearer token used for subsequent requests.
    fn set_access_token(&self, token: Option<String>);

    /// Install the 401 hook.
    fn set_unauthorized_hook(&self, hook: UnauthorizedHook);

    // Auth
    async fn login(&self, req: &LoginRequest) -> ApiResult<AuthResponse>;
    async fn register(&self, req: &RegisterRequest) -> ApiResult<AuthResponse>;
    async fn logout(&self) -> ApiResult<()>;
    async fn get_profile(&self) -> ApiResult<User>;

    // Houses
    async fn create_house(&self, req: &NewHouse) -> ApiResult<House>;
    async fn join_house(&self, invite_code: &str) -> ApiResult<House>;
    async fn get_houses(&self) -> ApiResult<Vec<House>>;
    async fn get_house_details(&self, house_id: &str) -> ApiResult<House>;
    async fn update_house(&self, house_id: &str, patch: &HousePatch) -> ApiResult<House>;

    // House-scoped dashboard resources
    async fn get_balances(&self, house_id: &str) -> ApiResult<Vec<Balance>>;
    async fn get_shopping_items(&self, house_id: &str) -> ApiResult<Vec<ShoppingItem>>;
    async fn get_expenses(&self, house_id: &str) -> ApiResult<Vec<Expense>>;
    async fn get_payments(&self, house_id: &str) -> ApiResult<Vec<Payment>>;
}

/// Client-side invite code check: 6-10 ASCII alphanumerics.
///
/// Format-only; whether the code actually maps to a house is the server's
/// call.
pub fn validate_invite_code(code: &str) -> ApiResult<()> {
    let trimmed = code.trim();
    if !(6..=10).contains(&trimmed.len()) {
        return Err(ApiError::Validation(format!(
            "Invite code must be 6-10 characters, got {}",
            trimmed.len()
        )));
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ApiError::Validation(
            "Invite code may only contain letters and digits".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_invite_codes() {
        assert!(validate_invite_code("OAK123").is_ok());
        assert!(validate_invite_code("abc4567890").is_ok());
        assert!(validate_invite_code("  OAK123  ").is_ok());
    }

    #[test]
    fn test_invalid_invite_codes() {
        assert!(validate_invite_code("short").is_err());
        assert!(validate_invite_code("waytoolongcode1").is_err());
        assert!(validate_invite_code("OAK-12").is_err());
        assert!(validate_invite_code("").is_err());
    }
}
