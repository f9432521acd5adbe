//! Login, simulate a process restart, and validate the cached session.
//!
//! Uses the real file-backed storage in a temp directory so the restart is
//! a genuine re-open of the persisted cache.

use hearth_api::{ApiResult, RemoteApi, UnauthorizedHook};
use hearth_auth::{AuthState, SessionManager};
use hearth_models::{
    AuthResponse, Balance, Expense, House, HousePatch, LoginRequest, NewHouse, Payment,
    RegisterRequest, ShoppingItem, User,
};
use hearth_storage::{CacheManager, FileStorage};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockApi {
    login_results: Mutex<VecDeque<ApiResult<AuthResponse>>>,
    profile_results: Mutex<VecDeque<ApiResult<User>>>,
    token: Mutex<Option<String>>,
}

#[async_trait::async_trait]
impl RemoteApi for MockApi {
    fn set_access_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }

    fn set_unauthorized_hook(&self, _hook: UnauthorizedHook) {}

    async fn login(&self, _req: &LoginRequest) -> ApiResult<AuthResponse> {
        self.login_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("no login result queued")
    }

    async fn register(&self, _req: &RegisterRequest) -> ApiResult<AuthResponse> {
        unimplemented!()
    }

    async fn logout(&self) -> ApiResult<()> {
        Ok(())
    }

    async fn get_profile(&self) -> ApiResult<User> {
        self.profile_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("no profile result queued")
    }

    async fn create_house(&self, _req: &NewHouse) -> ApiResult<House> {
        unimplemented!()
    }
    async fn join_house(&self, _invite_code: &str) -> ApiResult<House> {
        unimplemented!()
    }
    async fn get_houses(&self) -> ApiResult<Vec<House>> {
        unimplemented!()
    }
    async fn get_house_details(&self, _house_id: &str) -> ApiResult<House> {
        unimplemented!()
    }
    async fn update_house(&self, _house_id: &str, _patch: &HousePatch) -> ApiResult<House> {
        unimplemented!()
    }
    async fn get_balances(&self, _house_id: &str) -> ApiResult<Vec<Balance>> {
        unimplemented!()
    }
    async fn get_shopping_items(&self, _house_id: &str) -> ApiResult<Vec<ShoppingItem>> {
        unimplemented!()
    }
    async fn get_expenses(&self, _house_id: &str) -> ApiResult<Vec<Expense>> {
        unimplemented!()
    }
    async fn get_payments(&self, _house_id: &str) -> ApiResult<Vec<Payment>> {
        unimplemented!()
    }
}

fn test_user(id: &str) -> User {
    User {
        id: id.to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        color: None,
        avatar_url: None,
    }
}

#[tokio::test]
async fn login_survives_restart_when_server_still_validates() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");

    // First process: login
    {
        let cache = Arc::new(CacheManager::new(Box::new(
            FileStorage::open(&cache_path).unwrap(),
        )));
        let api = Arc::new(MockApi::default());
        api.login_results.lock().unwrap().push_back(Ok(AuthResponse {
            access_token: "tok-123".to_string(),
            user: test_user("u1"),
        }));

        let manager = SessionManager::new(cache, api);
        manager.login("ada@example.com", "pw").await.unwrap();
        assert_eq!(manager.auth_state(), AuthState::SignedIn);
    }

    // Second process: fresh manager over the same cache file
    let cache = Arc::new(CacheManager::new(Box::new(
        FileStorage::open(&cache_path).unwrap(),
    )));
    let api = Arc::new(MockApi::default());
    api.profile_results
        .lock()
        .unwrap()
        .push_back(Ok(test_user("u1")));

    let manager = SessionManager::new(cache.clone(), api.clone());
    assert!(manager.check_auth_status().await);

    // Equivalent session: same user id, same token
    assert_eq!(manager.current_user().unwrap().id, "u1");
    assert_eq!(cache.get_auth_token().unwrap(), Some("tok-123".to_string()));
    assert_eq!(api.token.lock().unwrap().as_deref(), Some("tok-123"));
}

#[tokio::test]
async fn restart_with_revoked_token_ends_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");

    {
        let cache = Arc::new(CacheManager::new(Box::new(
            FileStorage::open(&cache_path).unwrap(),
        )));
        let api = Arc::new(MockApi::default());
        api.login_results.lock().unwrap().push_back(Ok(AuthResponse {
            access_token: "tok-123".to_string(),
            user: test_user("u1"),
        }));
        SessionManager::new(cache, api.clone())
            .login("ada@example.com", "pw")
            .await
            .unwrap();
    }

    let cache = Arc::new(CacheManager::new(Box::new(
        FileStorage::open(&cache_path).unwrap(),
    )));
    let api = Arc::new(MockApi::default());
    api.profile_results
        .lock()
        .unwrap()
        .push_back(Err(hearth_api::ApiError::from_status(
            401,
            "revoked".into(),
        )));

    let manager = SessionManager::new(cache.clone(), api);
    assert!(!manager.check_auth_status().await);
    assert_eq!(manager.auth_state(), AuthState::SignedOut);
    assert!(cache.get_auth_token().unwrap().is_none());
}
