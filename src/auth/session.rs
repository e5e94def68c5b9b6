use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// Persisted session state. Holds the one access token issued at login.
///
/// The token is opaque and has no locally tracked expiry: the service
/// decides when it is no longer valid, and a rejected authenticated
/// request is what retires it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(token: String, username: String) -> Self {
        Self {
            token,
            username,
            created_at: Utc::now(),
        }
    }
}

/// Durable store for the current session, backed by a JSON file that
/// survives restarts. At most one session is stored at a time; an empty
/// store means logged out.
pub struct Session {
    dir: PathBuf,
    data: Option<SessionData>,
}

impl Session {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir, data: None }
    }

    /// Load the session from disk. Returns true if one was found.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read session file")?;
            let data: SessionData =
                serde_json::from_str(&contents).context("Failed to parse session file")?;
            self.data = Some(data);
            return Ok(true);
        }
        Ok(false)
    }

    /// Save the session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Clear the session, in memory and on disk. After this the store
    /// reports logged out.
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Replace the stored session. Any previous token is discarded.
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    /// Get the bearer token, if logged in
    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    /// Get the username the session was created for, if logged in
    pub fn username(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.username.as_str())
    }

    /// When the session was created, if logged in
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.data.as_ref().map(|d| d.created_at)
    }

    pub fn is_logged_in(&self) -> bool {
        self.data.is_some()
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_update_then_token_roundtrip() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut session = Session::new(dir.path().to_path_buf());

        assert!(!session.is_logged_in());
        assert!(session.token().is_none());

        session.update(SessionData::new(
            "tok123".to_string(),
            "user@example.com".to_string(),
        ));
        assert_eq!(session.token(), Some("tok123"));
        assert_eq!(session.username(), Some("user@example.com"));
    }

    #[test]
    fn test_save_and_load_across_instances() {
        let dir = tempdir().expect("Failed to create temp dir");

        let mut session = Session::new(dir.path().to_path_buf());
        session.update(SessionData::new(
            "tok123".to_string(),
            "user@example.com".to_string(),
        ));
        session.save().expect("Failed to save session");

        let mut reloaded = Session::new(dir.path().to_path_buf());
        assert!(reloaded.load().expect("Failed to load session"));
        assert_eq!(reloaded.token(), Some("tok123"));
    }

    #[test]
    fn test_load_without_file_reports_logged_out() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut session = Session::new(dir.path().to_path_buf());
        assert!(!session.load().expect("Load should succeed with no file"));
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_clear_removes_file_and_state() {
        let dir = tempdir().expect("Failed to create temp dir");

        let mut session = Session::new(dir.path().to_path_buf());
        session.update(SessionData::new(
            "tok123".to_string(),
            "user@example.com".to_string(),
        ));
        session.save().expect("Failed to save session");
        session.clear().expect("Failed to clear session");

        assert!(session.token().is_none());

        let mut reloaded = Session::new(dir.path().to_path_buf());
        assert!(!reloaded.load().expect("Load should succeed after clear"));
    }

    #[test]
    fn test_update_replaces_previous_token() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut session = Session::new(dir.path().to_path_buf());

        session.update(SessionData::new(
            "tok123".to_string(),
            "user@example.com".to_string(),
        ));
        session.update(SessionData::new(
            "tok456".to_string(),
            "user@example.com".to_string(),
        ));
        assert_eq!(session.token(), Some("tok456"));
    }
}
