//! Data models for the user service.
//!
//! Wire types use the service's camelCase field names via serde renames;
//! domain code works with the snake_case struct fields.

pub mod user;

pub use user::{LoginRequest, LoginResponse, RegisteredUser, RegistrationRequest, UserProfile};
