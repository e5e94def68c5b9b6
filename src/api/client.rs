//! HTTP client for the remote user service.
//!
//! This module provides the `ApiClient` struct wrapping the three
//! endpoints the client depends on: login, registration, and the
//! authenticated profile fetch.
//!
//! The profile fetch reads the bearer token from the session store on
//! every call and fails fast - without issuing a request - when the
//! store is empty. Requests are single attempts; there is no retry.

use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::{Session, SessionData};
use crate::models::{
    LoginRequest, LoginResponse, RegisteredUser, RegistrationRequest, UserProfile,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL used when neither the environment nor the config names one
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Login endpoint path
const LOGIN_PATH: &str = "/user/login";

/// Registration and profile endpoint path
const USER_PATH: &str = "/user";

/// Client for the user service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client for the given base URL
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut base_url = base_url.into();
        // Paths below start with '/'; a trailing slash would double it
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Authenticate against the service and return session data ready for
    /// the store. Exactly one request per call; the caller's in-flight
    /// guard prevents concurrent submissions.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionData, ApiError> {
        let url = self.url(LOGIN_PATH);

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = %status, "Login rejected");
            return Err(ApiError::for_login(status, &body));
        }

        let body: LoginResponse = Self::parse_json(response).await?;
        debug!(username = %username, "Login succeeded");

        Ok(SessionData::new(body.access_token, username.to_string()))
    }

    /// Register a new account. No token is issued; the user logs in
    /// afterwards.
    pub async fn register(
        &self,
        request: &RegistrationRequest<'_>,
    ) -> Result<RegisteredUser, ApiError> {
        let url = self.url(USER_PATH);

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = %status, "Registration rejected");
            return Err(ApiError::for_register(status, &body));
        }

        debug!("Registration succeeded");
        Self::parse_json(response).await
    }

    /// Fetch the signed-in user's profile.
    ///
    /// Reads the token from the session store; with no token this fails
    /// with `Unauthenticated` before any request is built. A 401 response
    /// maps to `SessionExpired` - the caller retires the stored token.
    pub async fn fetch_profile(&self, session: &Session) -> Result<UserProfile, ApiError> {
        let token = session.token().ok_or(ApiError::Unauthenticated)?;
        let url = self.url(USER_PATH);

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, Self::bearer_value(token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = %status, "Profile fetch rejected");
            return Err(ApiError::for_authenticated(status, &body));
        }

        Self::parse_json(response).await
    }

    /// Parse a success response body, reporting parse failures with a
    /// snippet of what was received.
    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "Status {}: {} (body starts with: {})",
                status,
                e,
                &text[..text.len().min(200)]
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Session;
    use std::path::PathBuf;

    #[test]
    fn test_bearer_value_format() {
        assert_eq!(ApiClient::bearer_value("tok123"), "Bearer tok123");
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = ApiClient::new("http://localhost:5000/").expect("Failed to build client");
        assert_eq!(client.url(LOGIN_PATH), "http://localhost:5000/user/login");
        assert_eq!(client.url(USER_PATH), "http://localhost:5000/user");
    }

    #[tokio::test]
    async fn test_fetch_profile_without_token_fails_fast() {
        // An unroutable base URL: if the client issued a request anyway,
        // the error would be Network, not Unauthenticated.
        let client = ApiClient::new("http://192.0.2.1:1").expect("Failed to build client");
        let session = Session::new(PathBuf::from("/nonexistent"));

        let err = client
            .fetch_profile(&session)
            .await
            .expect_err("Fetch without a token must fail");
        assert!(matches!(err, ApiError::Unauthenticated));
    }
}
