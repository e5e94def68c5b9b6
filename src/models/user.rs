use serde::{Deserialize, Serialize};

/// Profile of the signed-in user as returned by `GET /user`.
///
/// Never written to disk - the profile is only valid for as long as the
/// token that fetched it, so it lives in transient view state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Body for `POST /user/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login response. The service may return additional fields;
/// only the token is consumed.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Body for `POST /user` (registration).
#[derive(Debug, Serialize)]
pub struct RegistrationRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: &'a str,
    #[serde(rename = "firstName")]
    pub first_name: &'a str,
    #[serde(rename = "lastName")]
    pub last_name: &'a str,
}

/// User object echoed back by a successful registration.
/// Parsed leniently - the fields are only used for the success notice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisteredUser {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", default)]
    pub last_name: Option<String>,
}

impl RegisteredUser {
    /// Name for the success notice, when the service echoed one back
    pub fn display_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.to_string()),
            (None, Some(last)) => Some(last.to_string()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_response() {
        let json = r#"{"accessToken":"tok123","tokenType":"Bearer","expiresIn":3600}"#;
        let resp: LoginResponse = serde_json::from_str(json).expect("Failed to parse login response");
        assert_eq!(resp.access_token, "tok123");
    }

    #[test]
    fn test_parse_user_profile() {
        let json = r#"{"email":"jane@example.com","firstName":"Jane","lastName":"Doe"}"#;
        let profile: UserProfile = serde_json::from_str(json).expect("Failed to parse profile");
        assert_eq!(profile.email, "jane@example.com");
        assert_eq!(profile.display_name(), "Jane Doe");
    }

    #[test]
    fn test_login_request_wire_names() {
        let req = LoginRequest {
            username: "jane@example.com",
            password: "abcdefg1",
        };
        let json = serde_json::to_value(&req).expect("Failed to serialize login request");
        assert_eq!(json["username"], "jane@example.com");
        assert_eq!(json["password"], "abcdefg1");
    }

    #[test]
    fn test_registration_request_wire_names() {
        let req = RegistrationRequest {
            username: "jane@example.com",
            password: "abcdefg1",
            password_confirm: "abcdefg1",
            first_name: "Jane",
            last_name: "Doe",
        };
        let json = serde_json::to_value(&req).expect("Failed to serialize registration request");
        assert_eq!(json["passwordConfirm"], "abcdefg1");
        assert_eq!(json["firstName"], "Jane");
        assert_eq!(json["lastName"], "Doe");
    }

    #[test]
    fn test_parse_registered_user_with_missing_fields() {
        let user: RegisteredUser =
            serde_json::from_str(r#"{"email":"jane@example.com"}"#).expect("Failed to parse user");
        assert_eq!(user.email.as_deref(), Some("jane@example.com"));
        assert!(user.first_name.is_none());
        assert!(user.display_name().is_none());
    }

    #[test]
    fn test_registered_user_display_name() {
        let user: RegisteredUser =
            serde_json::from_str(r#"{"firstName":"Jane","lastName":"Doe"}"#)
                .expect("Failed to parse user");
        assert_eq!(user.display_name().as_deref(), Some("Jane Doe"));

        let partial: RegisteredUser =
            serde_json::from_str(r#"{"firstName":"Jane"}"#).expect("Failed to parse user");
        assert_eq!(partial.display_name().as_deref(), Some("Jane"));
    }
}
