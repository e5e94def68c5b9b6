//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `Session`: the durable store for the single access token
//! - `SessionGuard`: the view-level gate deciding login redirects
//! - `CredentialStore`: optional OS-level credential storage via keyring
//!
//! The session is persisted to disk; expiry is discovered reactively
//! when the service rejects an authenticated request.

pub mod credentials;
pub mod guard;
pub mod session;

pub use credentials::CredentialStore;
pub use guard::{GuardState, SessionGuard};
pub use session::{Session, SessionData};
