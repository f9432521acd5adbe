//! User identity and authentication payloads.

use serde::{Deserialize, Serialize};

/// An authenticated user's profile.
///
/// Owned by the session layer; mutated only by login/register responses and
/// profile re-fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Stable user ID assigned by the server.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Personalization color (hex string, e.g. "#e07a5f").
    #[serde(default)]
    pub color: Option<String>,
    /// Avatar image URL, if one was uploaded.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Response body for login/register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// The authenticated user.
    pub user: User,
}
