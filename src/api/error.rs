use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the user-service client.
///
/// Each endpoint maps its documented failure statuses onto a dedicated
/// variant; anything undocumented falls through to `RequestFailed`.
/// Nothing here is retried - the user resubmits.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No token in the session store; the request was never issued.
    #[error("Not logged in")]
    Unauthenticated,

    /// 401 on an authenticated fetch. Terminal: the stored token is
    /// retired and the user must log in again.
    #[error("Session expired - please log in again")]
    SessionExpired,

    /// 401 on login
    #[error("Invalid username or password")]
    AuthenticationRejected,

    /// 400 on login
    #[error("The submitted credentials were malformed")]
    InvalidCredentialsFormat(String),

    /// 400 on registration
    #[error("The submitted registration data was invalid")]
    InvalidInput(String),

    /// 409 on registration
    #[error("An account with this email already exists")]
    UserAlreadyExists,

    /// Any other non-success status
    #[error("Request failed with status {status}")]
    RequestFailed { status: u16, body: String },

    /// Transport-level failure (DNS, refused connection, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A success response whose body could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies carried in error values
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid carrying excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    /// Map a failed `POST /user/login` response
    pub fn for_login(status: StatusCode, body: &str) -> Self {
        match status.as_u16() {
            400 => ApiError::InvalidCredentialsFormat(Self::truncate_body(body)),
            401 => ApiError::AuthenticationRejected,
            _ => Self::request_failed(status, body),
        }
    }

    /// Map a failed `POST /user` (registration) response
    pub fn for_register(status: StatusCode, body: &str) -> Self {
        match status.as_u16() {
            400 => ApiError::InvalidInput(Self::truncate_body(body)),
            409 => ApiError::UserAlreadyExists,
            _ => Self::request_failed(status, body),
        }
    }

    /// Map a failed authenticated `GET` response
    pub fn for_authenticated(status: StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 => ApiError::SessionExpired,
            _ => Self::request_failed(status, body),
        }
    }

    fn request_failed(status: StatusCode, body: &str) -> Self {
        ApiError::RequestFailed {
            status: status.as_u16(),
            body: Self::truncate_body(body),
        }
    }

    /// Whether this error must retire the stored token
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_status_mapping() {
        assert!(matches!(
            ApiError::for_login(StatusCode::BAD_REQUEST, "bad fields"),
            ApiError::InvalidCredentialsFormat(_)
        ));
        assert!(matches!(
            ApiError::for_login(StatusCode::UNAUTHORIZED, ""),
            ApiError::AuthenticationRejected
        ));
        assert!(matches!(
            ApiError::for_login(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::RequestFailed { status: 500, .. }
        ));
    }

    #[test]
    fn test_register_status_mapping() {
        assert!(matches!(
            ApiError::for_register(StatusCode::BAD_REQUEST, "invalid"),
            ApiError::InvalidInput(_)
        ));
        assert!(matches!(
            ApiError::for_register(StatusCode::CONFLICT, ""),
            ApiError::UserAlreadyExists
        ));
        assert!(matches!(
            ApiError::for_register(StatusCode::SERVICE_UNAVAILABLE, ""),
            ApiError::RequestFailed { status: 503, .. }
        ));
    }

    #[test]
    fn test_authenticated_fetch_status_mapping() {
        let err = ApiError::for_authenticated(StatusCode::UNAUTHORIZED, "");
        assert!(err.is_session_expired());

        assert!(matches!(
            ApiError::for_authenticated(StatusCode::NOT_FOUND, "missing"),
            ApiError::RequestFailed { status: 404, .. }
        ));
    }

    #[test]
    fn test_body_truncation() {
        let long_body = "x".repeat(2000);
        match ApiError::for_register(StatusCode::BAD_REQUEST, &long_body) {
            ApiError::InvalidInput(body) => {
                assert!(body.len() < long_body.len());
                assert!(body.contains("truncated"));
                assert!(body.contains("2000 total bytes"));
            }
            other => panic!("Unexpected mapping: {other:?}"),
        }
    }
}
