//! REST client for the Hearth backend.
//!
//! This crate provides:
//! - The [`RemoteApi`] trait, the seam between the sync layers and the wire
//! - [`HttpApi`], the reqwest implementation
//! - The [`ApiError`] taxonomy shared by every remote call
//! - The cross-cutting 401 hook: any unauthorized response wipes the
//!   persisted session bundle, regardless of which call triggered it

mod api;
mod error;
mod http;

pub use api::{validate_invite_code, RemoteApi, UnauthorizedHook};
pub use error::{ApiError, ApiResult};
pub use http::HttpApi;
