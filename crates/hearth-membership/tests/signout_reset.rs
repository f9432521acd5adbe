//! Sign-out must reset the membership layer, not just the session bundle.
//!
//! Composes a real `SessionManager` and `MembershipCache` over one shared
//! cache, the way the client wires them, and checks that every path into
//! the signed-out state empties the in-memory house set along with the
//! persisted keys.

use hearth_api::{ApiError, ApiResult, RemoteApi, UnauthorizedHook};
use hearth_auth::{AuthState, SessionManager};
use hearth_membership::MembershipCache;
use hearth_models::{
    AuthResponse, Balance, Expense, House, HousePatch, HouseRole, LoginRequest, Membership,
    NewHouse, Payment, RegisterRequest, ShoppingItem, User,
};
use hearth_storage::{CacheManager, KeyValueStore, StorageResult};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

struct MemoryStorage {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }
}

impl KeyValueStore for MemoryStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.data
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        Ok(self.data.lock().unwrap().remove(key).is_some())
    }
}

#[derive(Default)]
struct MockApi {
    login_results: Mutex<VecDeque<ApiResult<AuthResponse>>>,
    profile_results: Mutex<VecDeque<ApiResult<User>>>,
    houses_results: Mutex<VecDeque<ApiResult<Vec<House>>>>,
    hook: Mutex<Option<UnauthorizedHook>>,
}

impl MockApi {
    /// Mirror HttpApi: a 401 fires the hook before the error surfaces.
    fn fire_hook_on_401<T>(&self, result: &ApiResult<T>) {
        if let Err(e) = result {
            if e.is_unauthorized() {
                let hook = self.hook.lock().unwrap().clone();
                if let Some(hook) = hook {
                    hook();
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl RemoteApi for MockApi {
    fn set_access_token(&self, _token: Option<String>) {}

    fn set_unauthorized_hook(&self, hook: UnauthorizedHook) {
        *self.hook.lock().unwrap() = Some(hook);
    }

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
        let result = self
            .profile_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("no profile result queued");
        self.fire_hook_on_401(&result);
        result
    }

    async fn create_house(&self, _req: &NewHouse) -> ApiResult<House> {
        unimplemented!()
    }
    async fn join_house(&self, _invite_code: &str) -> ApiResult<House> {
        unimplemented!()
    }
    async fn get_houses(&self) -> ApiResult<Vec<House>> {
        self.houses_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("no houses result queued")
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

fn test_house(id: &str) -> House {
    House {
        id: id.to_string(),
        name: "Oak St".to_string(),
        color: None,
        invite_code: None,
        members: vec![],
        membership: Some(Membership {
            user_id: "u1".to_string(),
            role: HouseRole::Admin,
            nickname: None,
        }),
    }
}

fn compose() -> (
    Arc<CacheManager>,
    Arc<MockApi>,
    SessionManager,
    Arc<MembershipCache>,
) {
    let cache = Arc::new(CacheManager::new(Box::new(MemoryStorage::new())));
    let api = Arc::new(MockApi::default());
    let session = SessionManager::new(cache.clone(), api.clone());
    let membership = Arc::new(MembershipCache::new(cache.clone(), api.clone()));
    membership.bind_to_session(&session);
    (cache, api, session, membership)
}

#[tokio::test]
async fn logout_resets_in_memory_membership() {
    let (cache, api, session, membership) = compose();
    api.login_results.lock().unwrap().push_back(Ok(AuthResponse {
        access_token: "tok-123".to_string(),
        user: test_user("u1"),
    }));
    api.houses_results
        .lock()
        .unwrap()
        .push_back(Ok(vec![test_house("h1")]));

    session.login("ada@example.com", "pw").await.unwrap();
    membership.refresh_houses().await.unwrap();
    assert_eq!(membership.snapshot().houses().len(), 1);
    assert!(membership.current_house().is_some());

    session.logout().await;

    // The in-memory set is empty, not just the persisted keys
    assert!(membership.snapshot().is_empty());
    assert!(membership.current_house().is_none());
    assert!(cache.get_houses().unwrap().is_none());
    assert!(cache.get_current_house().unwrap().is_none());
}

#[tokio::test]
async fn rejected_session_validation_resets_membership() {
    let (cache, api, session, membership) = compose();
    cache.set_auth_token("tok-expired").unwrap();
    cache.set_user(&test_user("u1")).unwrap();
    api.houses_results
        .lock()
        .unwrap()
        .push_back(Ok(vec![test_house("h1")]));
    membership.refresh_houses().await.unwrap();

    api.profile_results
        .lock()
        .unwrap()
        .push_back(Err(ApiError::from_status(401, "revoked".into())));

    assert!(!session.check_auth_status().await);
    assert_eq!(session.auth_state(), AuthState::SignedOut);
    assert!(membership.snapshot().is_empty());
    assert!(cache.get_houses().unwrap().is_none());
}
