use super::rules::{check_all, FieldErrors, LOGIN_RULES};

/// Login form state: field values, per-field validation errors, and the
/// submission-in-flight flag that blocks duplicate submits.
#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub errors: FieldErrors,
    /// Banner error from the last submit attempt (server or network).
    pub error: Option<String>,
    in_flight: bool,
}

impl LoginForm {
    pub fn new(username: String, password: String) -> Self {
        Self {
            username,
            password,
            ..Self::default()
        }
    }

    /// Run the local validation gate, recording per-field errors.
    /// Returns true when the form may be submitted.
    pub fn validate(&mut self) -> bool {
        self.errors = check_all(LOGIN_RULES, |field| match field {
            "username" => self.username.as_str(),
            "password" => self.password.as_str(),
            _ => "",
        });
        self.errors.is_empty()
    }

    /// Mark a submission as outstanding. Returns false if one already is,
    /// in which case the caller must not issue another request.
    pub fn begin_submit(&mut self) -> bool {
        if self.is_in_flight() {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Mark the outstanding submission as finished.
    pub fn finish_submit(&mut self) {
        self.in_flight = false;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Reset the form to its initial state (explicit cancel or successful
    /// submit).
    pub fn reset(&mut self) {
        self.username.clear();
        self.password.clear();
        self.errors.clear();
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> LoginForm {
        LoginForm::new("user@example.com".to_string(), "abcdefg1".to_string())
    }

    #[test]
    fn test_valid_credentials_pass() {
        let mut form = valid_form();
        assert!(form.validate());
        assert!(form.errors.is_empty());
    }

    #[test]
    fn test_invalid_email_blocks_submission() {
        let mut form = LoginForm::new("not-an-email".to_string(), "abcdefg1".to_string());
        assert!(!form.validate());
        assert!(form.errors.contains_key("username"));
    }

    #[test]
    fn test_weak_password_blocks_submission() {
        let mut form = LoginForm::new("user@example.com".to_string(), "ABCDEFG1".to_string());
        assert!(!form.validate());
        assert!(form.errors.contains_key("password"));
    }

    #[test]
    fn test_in_flight_guard_admits_one_submission() {
        let mut form = valid_form();
        assert!(form.begin_submit());
        assert!(!form.begin_submit());
        form.finish_submit();
        assert!(form.begin_submit());
    }

    #[test]
    fn test_reset_clears_fields_and_errors() {
        let mut form = LoginForm::new("bad".to_string(), "short".to_string());
        form.validate();
        form.error = Some("Invalid username or password".to_string());
        form.reset();
        assert!(form.username.is_empty());
        assert!(form.password.is_empty());
        assert!(form.errors.is_empty());
        assert!(form.error.is_none());
    }
}
