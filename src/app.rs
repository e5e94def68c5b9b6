//! Application state management for Userdeck.
//!
//! This module contains the `App` struct that owns the configuration,
//! the session store, the API client, and the two form states, and
//! coordinates the login, registration, profile, and logout flows.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::api::{ApiClient, ApiError, DEFAULT_BASE_URL};
use crate::auth::{CredentialStore, GuardState, Session, SessionGuard};
use crate::config::Config;
use crate::forms::{LoginForm, RegisterForm};
use crate::models::{RegisteredUser, RegistrationRequest};

// ============================================================================
// Constants
// ============================================================================

/// Env var overriding the service base URL
const SERVER_URL_ENV: &str = "USERDECK_SERVER_URL";

/// Env vars pre-filling the login form for non-interactive use
const USERNAME_ENV: &str = "USERDECK_USERNAME";
const PASSWORD_ENV: &str = "USERDECK_PASSWORD";

/// Main application state container
pub struct App {
    pub config: Config,
    pub session: Session,
    pub api: ApiClient,

    pub login_form: LoginForm,
    pub register_form: RegisterForm,

    /// User-visible notice from the last flow (banner/toast equivalent)
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let session_dir = config
            .session_dir()
            .unwrap_or_else(|_| PathBuf::from("./session"));
        let mut session = Session::new(session_dir);
        match session.load() {
            Ok(found) => info!(found, "Session loaded"),
            Err(e) => warn!(error = %e, "Failed to load session"),
        }

        let base_url = std::env::var(SERVER_URL_ENV)
            .ok()
            .or_else(|| config.server_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api = ApiClient::new(base_url)?;
        info!(base_url = %api.base_url(), "API client ready");

        // Credentials from env vars or config, for pre-filling the form
        let login_username = std::env::var(USERNAME_ENV)
            .ok()
            .or_else(|| config.last_username.clone())
            .unwrap_or_default();
        let login_password = std::env::var(PASSWORD_ENV).unwrap_or_default();

        Ok(Self {
            config,
            session,
            api,
            login_form: LoginForm::new(login_username, login_password),
            register_form: RegisterForm::default(),
            status_message: None,
        })
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Submit the login form.
    ///
    /// The local validation gate runs first; a form that fails it issues
    /// no request. An accepted submission issues exactly one request -
    /// the in-flight flag rejects a second submit while one is
    /// outstanding. On success the token lands in the session store.
    pub async fn attempt_login(&mut self) -> Result<()> {
        self.login_form.error = None;

        if !self.login_form.validate() {
            return Err(anyhow::anyhow!("Login form failed validation"));
        }
        if !self.login_form.begin_submit() {
            return Err(anyhow::anyhow!("A login request is already outstanding"));
        }

        let username = self.login_form.username.clone();
        let password = self.login_form.password.clone();

        let result = self.api.login(&username, &password).await;
        self.login_form.finish_submit();

        match result {
            Ok(session_data) => {
                self.session.update(session_data);
                if let Err(e) = self.session.save() {
                    warn!(error = %e, "Failed to save session");
                }

                if let Err(e) = CredentialStore::store(&username, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.login_form.reset();
                info!("Login successful");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login_form.error = Some(Self::login_error_message(&e));
                Err(e.into())
            }
        }
    }

    fn login_error_message(err: &ApiError) -> String {
        match err {
            ApiError::AuthenticationRejected => "Invalid username or password".to_string(),
            ApiError::InvalidCredentialsFormat(_) => {
                "The server rejected the submitted credentials".to_string()
            }
            ApiError::Network(e) if e.is_timeout() => {
                "Connection timed out. Please try again.".to_string()
            }
            ApiError::Network(_) => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            other => format!("Login failed: {}", other),
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Submit the registration form.
    ///
    /// Same gating as login: local validation first, one request per
    /// accepted submission. A successful registration does NOT log the
    /// user in - no token is stored.
    pub async fn attempt_register(&mut self) -> Result<RegisteredUser> {
        self.register_form.error = None;

        if !self.register_form.validate() {
            return Err(anyhow::anyhow!("Registration form failed validation"));
        }
        if !self.register_form.begin_submit() {
            return Err(anyhow::anyhow!(
                "A registration request is already outstanding"
            ));
        }

        let request = RegistrationRequest {
            username: &self.register_form.username,
            password: &self.register_form.password,
            password_confirm: &self.register_form.password_confirm,
            first_name: &self.register_form.first_name,
            last_name: &self.register_form.last_name,
        };

        let result = self.api.register(&request).await;
        self.register_form.finish_submit();

        match result {
            Ok(user) => {
                info!("Registration successful");
                self.register_form.reset();
                self.status_message =
                    Some("Registration complete - you can now log in".to_string());
                Ok(user)
            }
            Err(e) => {
                error!(error = %e, "Registration failed");
                self.register_form.error = Some(Self::register_error_message(&e));
                Err(e.into())
            }
        }
    }

    fn register_error_message(err: &ApiError) -> String {
        match err {
            ApiError::UserAlreadyExists => "An account with this email already exists".to_string(),
            ApiError::InvalidInput(_) => "The submitted registration data was invalid".to_string(),
            ApiError::Network(e) if e.is_timeout() => {
                "Connection timed out. Please try again.".to_string()
            }
            ApiError::Network(_) => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            other => format!("Registration failed: {}", other),
        }
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Run the session guard for one profile view activation.
    ///
    /// An expired session has already been cleared by the guard when this
    /// returns; the caller redirects to login whenever the guard settles
    /// on `Unauthenticated`.
    pub async fn view_profile(&mut self) -> SessionGuard {
        let mut guard = SessionGuard::new();
        if let Err(err) = guard.activate(&mut self.session, &self.api).await {
            self.status_message = Some(match guard.state() {
                GuardState::Unauthenticated => "Session expired. Please log in again.".to_string(),
                _ => Self::fetch_error_message(&err),
            });
        }
        guard
    }

    fn fetch_error_message(err: &ApiError) -> String {
        match err {
            ApiError::Network(e) if e.is_timeout() => {
                "Connection timed out. Please try again.".to_string()
            }
            ApiError::Network(_) => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            other => format!("Failed to fetch profile: {}", other),
        }
    }

    // =========================================================================
    // Logout
    // =========================================================================

    /// Clear the session store. The next guarded view lands on login.
    pub fn logout(&mut self) -> Result<()> {
        self.session.clear()?;
        info!("Logged out");
        Ok(())
    }

    // =========================================================================
    // Interactive flows
    // =========================================================================

    /// Interactive login at the terminal. Loops until the service accepts
    /// the credentials, or returns false if the user aborts by entering
    /// an empty username.
    pub async fn login_interactive(&mut self) -> Result<bool> {
        println!("\n=== Userdeck Login ===\n");

        loop {
            if self.login_form.username.is_empty() {
                self.login_form.username =
                    Self::prompt_username(self.config.last_username.as_deref())?;
            }
            if self.login_form.username.is_empty() {
                return Ok(false);
            }
            if self.login_form.password.is_empty() {
                self.login_form.password = Self::obtain_password(&self.login_form.username)?;
            }

            println!("\nAuthenticating...");
            match self.attempt_login().await {
                Ok(()) => {
                    println!("Login successful!\n");
                    return Ok(true);
                }
                Err(_) => {
                    self.print_login_errors();
                    self.login_form.username.clear();
                    self.login_form.password.clear();
                }
            }
        }
    }

    fn print_login_errors(&self) {
        for (field, message) in &self.login_form.errors {
            println!("  {}: {}", field, message);
        }
        if let Some(ref banner) = self.login_form.error {
            println!("  {}", banner);
        }
        println!();
    }

    /// Interactive registration at the terminal. Returns false if the
    /// user aborts by entering an empty email.
    pub async fn register_interactive(&mut self) -> Result<bool> {
        println!("\n=== Userdeck Registration ===\n");

        loop {
            self.register_form.username = Self::prompt_field("Email")?;
            if self.register_form.username.is_empty() {
                return Ok(false);
            }
            self.register_form.password = rpassword::prompt_password("Password: ")?;
            self.register_form.password_confirm = rpassword::prompt_password("Confirm password: ")?;
            self.register_form.first_name = Self::prompt_field("First name")?;
            self.register_form.last_name = Self::prompt_field("Last name")?;

            println!("\nSubmitting registration...");
            match self.attempt_register().await {
                Ok(user) => {
                    match (user.display_name(), user.email.as_deref()) {
                        (Some(name), Some(email)) => {
                            println!("Account created for {} ({}).", name, email);
                        }
                        (None, Some(email)) => println!("Account created for {}.", email),
                        _ => println!("Account created."),
                    }
                    return Ok(true);
                }
                Err(_) => {
                    for (field, message) in &self.register_form.errors {
                        println!("  {}: {}", field, message);
                    }
                    if let Some(ref banner) = self.register_form.error {
                        println!("  {}", banner);
                    }
                    println!();
                }
            }
        }
    }

    fn prompt_username(last: Option<&str>) -> Result<String> {
        match last {
            Some(last) => print!("Username [{}]: ", last),
            None => print!("Username: "),
        }
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            Ok(last.unwrap_or_default().to_string())
        } else {
            Ok(input.to_string())
        }
    }

    fn prompt_field(label: &str) -> Result<String> {
        print!("{}: ", label);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }

    fn obtain_password(username: &str) -> Result<String> {
        if CredentialStore::has_credentials(username) {
            print!("Use stored password? [Y/n]: ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if input.trim().to_lowercase() != "n" {
                return CredentialStore::get_password(username);
            }
        }
        Ok(rpassword::prompt_password("Password: ")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_messages() {
        assert_eq!(
            App::login_error_message(&ApiError::AuthenticationRejected),
            "Invalid username or password"
        );
        assert_eq!(
            App::login_error_message(&ApiError::InvalidCredentialsFormat(String::new())),
            "The server rejected the submitted credentials"
        );
        assert!(App::login_error_message(&ApiError::RequestFailed {
            status: 500,
            body: String::new(),
        })
        .starts_with("Login failed"));
    }

    #[test]
    fn test_register_error_messages() {
        assert_eq!(
            App::register_error_message(&ApiError::UserAlreadyExists),
            "An account with this email already exists"
        );
        assert_eq!(
            App::register_error_message(&ApiError::InvalidInput(String::new())),
            "The submitted registration data was invalid"
        );
    }

    #[test]
    fn test_fetch_error_messages() {
        assert!(App::fetch_error_message(&ApiError::SessionExpired)
            .starts_with("Failed to fetch profile"));
    }
}
