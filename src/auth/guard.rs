//! View-level session gate.
//!
//! A guarded view constructs one `SessionGuard` per activation and drives
//! it either through `activate` (the async convenience that performs the
//! profile fetch) or through the discrete event methods, which keep the
//! transitions testable without any network or UI.
//!
//! Transitions:
//! - view entered, no token      -> Unauthenticated (redirect to login)
//! - view entered, token present -> Checking, then fetch
//! - fetch resolved              -> Authenticated (profile available)
//! - fetch rejected (expired)    -> store cleared, Unauthenticated
//! - fetch rejected (other)      -> stays Checking; error shown as banner
//!
//! A guard runs at most once per activation; repeated `activate` calls
//! (re-renders) are no-ops.

use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::UserProfile;

use super::Session;

/// Authentication status of one view activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Unknown,
    Checking,
    Authenticated,
    Unauthenticated,
}

/// Gate that decides whether a guarded view may show its content.
pub struct SessionGuard {
    state: GuardState,
    profile: Option<UserProfile>,
    activated: bool,
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGuard {
    pub fn new() -> Self {
        Self {
            state: GuardState::Unknown,
            profile: None,
            activated: false,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// The fetched profile, available once Authenticated
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Drive the guard for one view activation: check the store, fetch
    /// the profile when a token is present, and settle the state.
    ///
    /// Returns the fetch error, if any, for banner display; the decision
    /// itself is read from `state()`. Calling this again on the same
    /// guard does nothing.
    pub async fn activate(
        &mut self,
        session: &mut Session,
        api: &ApiClient,
    ) -> Result<(), ApiError> {
        if self.activated {
            debug!("Guard already activated, ignoring");
            return Ok(());
        }
        self.activated = true;

        self.on_view_enter(session.is_logged_in());
        if self.state == GuardState::Unauthenticated {
            return Ok(());
        }

        match api.fetch_profile(session).await {
            Ok(profile) => {
                self.on_fetch_resolved(profile);
                Ok(())
            }
            Err(err) => {
                self.on_fetch_rejected(session, &err);
                Err(err)
            }
        }
    }

    /// Event: the guarded view was entered.
    pub fn on_view_enter(&mut self, has_token: bool) {
        self.state = GuardState::Checking;
        if !has_token {
            debug!("No stored token, redirecting to login");
            self.state = GuardState::Unauthenticated;
        }
    }

    /// Event: the profile fetch succeeded.
    pub fn on_fetch_resolved(&mut self, profile: UserProfile) {
        debug!(user = %profile.display_name(), "Profile fetch resolved");
        self.profile = Some(profile);
        self.state = GuardState::Authenticated;
    }

    /// Event: the profile fetch failed.
    ///
    /// A rejected token always empties the store before redirecting, no
    /// matter which view triggered the fetch. Other failures leave the
    /// session intact and the guard unresolved for this activation.
    pub fn on_fetch_rejected(&mut self, session: &mut Session, err: &ApiError) {
        if err.is_session_expired() || matches!(err, ApiError::Unauthenticated) {
            if let Err(e) = session.clear() {
                warn!(error = %e, "Failed to clear session");
            }
            info!("Session rejected by the service, logging out");
            self.state = GuardState::Unauthenticated;
        }
    }
}
