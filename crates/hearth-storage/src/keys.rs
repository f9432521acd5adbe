//! Cache key constants.

/// Cache keys used by the client
pub struct CacheKeys;

impl CacheKeys {
    /// Bearer token string
    pub const AUTH_TOKEN: &'static str = "auth_token";

    /// Serialized User (JSON)
    pub const USER: &'static str = "user";

    /// Serialized House for the current selection (JSON)
    pub const CURRENT_HOUSE: &'static str = "current_house";

    /// Serialized House list (JSON array)
    pub const HOUSES: &'static str = "houses";

    /// "light" | "dark", written by the theme module
    pub const THEME_PREFERENCE: &'static str = "theme_preference";
}
