use super::rules::{check_all, FieldErrors, REGISTER_RULES};

/// Registration form state. Carries one field per registration input plus
/// the cross-field password confirmation.
#[derive(Debug, Default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
    pub errors: FieldErrors,
    /// Banner error from the last submit attempt (server or network).
    pub error: Option<String>,
    in_flight: bool,
}

impl RegisterForm {
    /// Run the local validation gate, recording per-field errors.
    /// Returns true when the form may be submitted.
    pub fn validate(&mut self) -> bool {
        self.errors = check_all(REGISTER_RULES, |field| match field {
            "username" => self.username.as_str(),
            "password" => self.password.as_str(),
            "passwordConfirm" => self.password_confirm.as_str(),
            "firstName" => self.first_name.as_str(),
            "lastName" => self.last_name.as_str(),
            _ => "",
        });

        // Cross-field check: the confirmation must match the password.
        // Only reported once the field itself passed its own checks.
        if !self.errors.contains_key("passwordConfirm") && self.password_confirm != self.password {
            self.errors
                .insert("passwordConfirm", "Passwords do not match".to_string());
        }

        self.errors.is_empty()
    }

    /// Mark a submission as outstanding. Returns false if one already is.
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

    /// Reset the form to its initial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegisterForm {
        RegisterForm {
            username: "jane@example.com".to_string(),
            password: "abcdefg1".to_string(),
            password_confirm: "abcdefg1".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            ..RegisterForm::default()
        }
    }

    #[test]
    fn test_complete_form_passes() {
        let mut form = valid_form();
        assert!(form.validate());
    }

    #[test]
    fn test_password_mismatch_blocks_submission() {
        let mut form = valid_form();
        form.password_confirm = "abcdefg2".to_string();
        assert!(!form.validate());
        assert_eq!(
            form.errors.get("passwordConfirm").map(String::as_str),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_empty_confirmation_reports_required_not_mismatch() {
        let mut form = valid_form();
        form.password_confirm = String::new();
        assert!(!form.validate());
        assert_eq!(
            form.errors.get("passwordConfirm").map(String::as_str),
            Some("This field is required")
        );
    }

    #[test]
    fn test_names_are_required() {
        let mut form = valid_form();
        form.first_name = String::new();
        form.last_name = "  ".to_string();
        assert!(!form.validate());
        assert!(form.errors.contains_key("firstName"));
        assert!(form.errors.contains_key("lastName"));
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
    fn test_reset_returns_to_default() {
        let mut form = valid_form();
        form.validate();
        form.reset();
        assert!(form.username.is_empty());
        assert!(form.errors.is_empty());
        assert!(!form.is_in_flight());
    }
}
