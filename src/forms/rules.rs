//! Data-driven field validation for the login and registration forms.
//!
//! Each form declares a rule table mapping a field name to the checks it
//! must pass. Checks run locally before any request is issued, so a form
//! that fails validation never reaches the network.

use std::collections::BTreeMap;

/// Minimum password length required by the service.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Per-field validation errors, keyed by field name.
/// BTreeMap keeps the display order stable.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// A single validation check. The first failing check produces the
/// field's error message; later checks are not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Required,
    Email,
    MinLen(usize),
    HasDigit,
    HasLowercase,
}

impl Check {
    /// Run this check against a value, returning the error message on failure.
    pub fn run(&self, value: &str) -> Option<String> {
        match self {
            Check::Required => {
                if value.trim().is_empty() {
                    Some("This field is required".to_string())
                } else {
                    None
                }
            }
            Check::Email => {
                if is_valid_email(value) {
                    None
                } else {
                    Some("A valid email address is required".to_string())
                }
            }
            Check::MinLen(min) => {
                if value.chars().count() < *min {
                    Some(format!("Must be at least {} characters long", min))
                } else {
                    None
                }
            }
            Check::HasDigit => {
                if value.chars().any(|c| c.is_ascii_digit()) {
                    None
                } else {
                    Some("Must contain at least one digit".to_string())
                }
            }
            Check::HasLowercase => {
                if value.chars().any(|c| c.is_lowercase()) {
                    None
                } else {
                    Some("Must contain at least one lowercase letter".to_string())
                }
            }
        }
    }
}

/// Rule table entry: the checks a named field must pass.
pub struct FieldRules {
    pub field: &'static str,
    pub checks: &'static [Check],
}

/// Checks shared by every password field.
pub const PASSWORD_CHECKS: &[Check] = &[
    Check::Required,
    Check::MinLen(MIN_PASSWORD_LENGTH),
    Check::HasDigit,
    Check::HasLowercase,
];

/// Login form rules: email-shaped username, service password policy.
pub const LOGIN_RULES: &[FieldRules] = &[
    FieldRules {
        field: "username",
        checks: &[Check::Required, Check::Email],
    },
    FieldRules {
        field: "password",
        checks: PASSWORD_CHECKS,
    },
];

/// Registration form rules. The password-confirmation equality check is
/// cross-field and handled by the form itself.
pub const REGISTER_RULES: &[FieldRules] = &[
    FieldRules {
        field: "username",
        checks: &[Check::Required, Check::Email],
    },
    FieldRules {
        field: "password",
        checks: PASSWORD_CHECKS,
    },
    FieldRules {
        field: "passwordConfirm",
        checks: &[Check::Required],
    },
    FieldRules {
        field: "firstName",
        checks: &[Check::Required],
    },
    FieldRules {
        field: "lastName",
        checks: &[Check::Required],
    },
];

/// Run a field's checks in order, returning the first failure.
pub fn check_field(checks: &[Check], value: &str) -> Option<String> {
    checks.iter().find_map(|check| check.run(value))
}

/// Run a whole rule table, resolving field values through `lookup`.
pub fn check_all<'a, F>(rules: &[FieldRules], lookup: F) -> FieldErrors
where
    F: Fn(&'static str) -> &'a str,
{
    let mut errors = FieldErrors::new();
    for rule in rules {
        if let Some(message) = check_field(rule.checks, lookup(rule.field)) {
            errors.insert(rule.field, message);
        }
    }
    errors
}

/// Validate that a string looks like an email address: a non-empty local
/// part, an `@`, and a dotted non-empty domain, with no whitespace.
pub fn is_valid_email(s: &str) -> bool {
    if s.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
