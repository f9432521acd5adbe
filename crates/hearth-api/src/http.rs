//! Reqwest implementation of the remote API.

use crate::{ApiError, ApiResult, RemoteApi, UnauthorizedHook};
use async_trait::async_trait;
use hearth_models::{
    AuthResponse, Balance, Expense, House, HousePatch, LoginRequest, NewHouse, Payment,
    RegisterRequest, ShoppingItem, User,
};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::RwLock;
use tracing::{debug, warn};

/// HTTP client for the Hearth backend.
pub struct HttpApi {
    http_client: reqwest::Client,
    base_url: String,
    access_token: RwLock<Option<String>>,
    unauthorized_hook: RwLock<Option<UnauthorizedHook>>,
}

impl HttpApi {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - The API base URL (e.g., `https://api.hearth.app`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            access_token: RwLock::new(None),
            unauthorized_hook: RwLock::new(None),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token, when one is set.
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let token = self.access_token.read().unwrap().clone();
        match token {
            Some(token) => builder.header("Authorization", format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// Map a non-success response into the error taxonomy.
    ///
    /// Fires the unauthorized hook on 401 before returning, independent of
    /// which endpoint produced the response.
    async fn handle_error(&self, response: Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, "Request failed");

        if status.as_u16() == 401 {
            let hook = self.unauthorized_hook.read().unwrap().clone();
            if let Some(hook) = hook {
                debug!("Unauthorized response, firing session wipe hook");
                hook();
            }
        }

        ApiError::from_status(status.as_u16(), body)
    }

    async fn json_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        if !response.status().is_success() {
            return Err(self.handle_error(response).await);
        }
        Ok(response.json().await?)
    }

    async fn empty_response(&self, response: Response) -> ApiResult<()> {
        if !response.status().is_success() {
            return Err(self.handle_error(response).await);
        }
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        debug!(path = %path, "GET");
        let response = self
            .authorized(self.http_client.get(self.url(path)))
            .header("Accept", "application/json")
            .send()
            .await?;
        self.json_response(response).await
    }

    async fn post_json<B: serde::Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        debug!(path = %path, "POST");
        let response = self
            .authorized(self.http_client.post(self.url(path)))
            .json(body)
            .send()
            .await?;
        self.json_response(response).await
    }
}

#[async_trait]
impl RemoteApi for HttpApi {
    fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write().unwrap() = token;
    }

    fn set_unauthorized_hook(&self, hook: UnauthorizedHook) {
        *self.unauthorized_hook.write().unwrap() = Some(hook);
    }

    async fn login(&self, req: &LoginRequest) -> ApiResult<AuthResponse> {
        self.post_json("/auth/login", req).await
    }

    async fn register(&self, req: &RegisterRequest) -> ApiResult<AuthResponse> {
        self.post_json("/auth/register", req).await
    }

    async fn logout(&self) -> ApiResult<()> {
        debug!("POST /auth/logout");
        let response = self
            .authorized(self.http_client.post(self.url("/auth/logout")))
            .send()
            .await?;
        self.empty_response(response).await
    }

    async fn get_profile(&self) -> ApiResult<User> {
        self.get_json("/auth/profile").await
    }

    async fn create_house(&self, req: &NewHouse) -> ApiResult<House> {
        self.post_json("/houses", req).await
    }

    async fn join_house(&self, invite_code: &str) -> ApiResult<House> {
        self.post_json(
            "/houses/join",
            &serde_json::json!({ "invite_code": invite_code }),
        )
        .await
    }

    async fn get_houses(&self) -> ApiResult<Vec<House>> {
        self.get_json("/houses").await
    }

    async fn get_house_details(&self, house_id: &str) -> ApiResult<House> {
        self.get_json(&format!("/houses/{}", house_id)).await
    }

    async fn update_house(&self, house_id: &str, patch: &HousePatch) -> ApiResult<House> {
        let path = format!("/houses/{}", house_id);
        debug!(path = %path, "PATCH");
        let response = self
            .authorized(self.http_client.patch(self.url(&path)))
            .json(patch)
            .send()
            .await?;
        self.json_response(response).await
    }

    async fn get_balances(&self, house_id: &str) -> ApiResult<Vec<Balance>> {
        self.get_json(&format!("/houses/{}/balances", house_id)).await
    }

    async fn get_shopping_items(&self, house_id: &str) -> ApiResult<Vec<ShoppingItem>> {
        self.get_json(&format!("/houses/{}/shopping-items", house_id))
            .await
    }

    async fn get_expenses(&self, house_id: &str) -> ApiResult<Vec<Expense>> {
        self.get_json(&format!("/houses/{}/expenses", house_id)).await
    }

    async fn get_payments(&self, house_id: &str) -> ApiResult<Vec<Payment>> {
        self.get_json(&format!("/houses/{}/payments", house_id)).await
    }
}
