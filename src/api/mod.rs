//! REST client module for the remote user service.
//!
//! This module provides the `ApiClient` for the login, registration, and
//! profile endpoints, and the `ApiError` taxonomy their responses map to.
//!
//! Authenticated requests carry a bearer token obtained at login.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::ApiError;
