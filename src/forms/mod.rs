//! Form state and validation for the login and registration flows.
//!
//! Validation is a fail-fast local gate: a form that does not pass its
//! rule table never issues a request. Each form also carries the
//! submission-in-flight flag that prevents duplicate concurrent submits.

pub mod login;
pub mod register;
pub mod rules;

pub use login::LoginForm;
pub use register::RegisterForm;
