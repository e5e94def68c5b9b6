//! Userdeck - a terminal client for a remote user service.
//!
//! Provides login, registration, profile viewing, and logout against the
//! service's REST API, with a session token persisted between runs.

mod api;
mod app;
mod auth;
mod config;
mod forms;
mod models;

use std::io;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use auth::GuardState;
use models::UserProfile;

// ============================================================================
// Constants
// ============================================================================

/// Pause between a successful registration and the login prompt, so the
/// success notice is seen before the screen moves on
const REGISTRATION_REDIRECT_DELAY_MS: u64 = 2000;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_usage() {
    eprintln!("Usage: userdeck [COMMAND]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  profile    Show the signed-in user's profile (default)");
    eprintln!("  login      Log in to the user service");
    eprintln!("  register   Create a new account");
    eprintln!("  logout     Discard the stored session");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("Userdeck starting");

    let mut app = App::new()?;

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("profile");

    let result = match command {
        "profile" => show_profile(&mut app).await,
        "login" => login(&mut app).await,
        "register" => register(&mut app).await,
        "logout" => logout(&mut app),
        _ => {
            print_usage();
            std::process::exit(2);
        }
    };

    info!("Userdeck shutting down");
    result
}

/// Guarded profile view: show the profile, or fall back to the login
/// flow when the guard decides the user is not authenticated.
async fn show_profile(app: &mut App) -> Result<()> {
    let guard = app.view_profile().await;

    match guard.state() {
        GuardState::Authenticated => {
            if let Some(profile) = guard.profile() {
                print_profile(app, profile);
            }
            Ok(())
        }
        GuardState::Unauthenticated => {
            if let Some(notice) = app.status_message.take() {
                println!("{}", notice);
            }
            // Redirect-to-login semantics
            if app.login_interactive().await? {
                let guard = app.view_profile().await;
                if let Some(profile) = guard.profile() {
                    print_profile(app, profile);
                } else if let Some(notice) = app.status_message.take() {
                    println!("{}", notice);
                }
            }
            Ok(())
        }
        _ => {
            if let Some(notice) = app.status_message.take() {
                eprintln!("Error: {}", notice);
            }
            Ok(())
        }
    }
}

async fn login(app: &mut App) -> Result<()> {
    if app.login_interactive().await? {
        show_profile(app).await?;
    }
    Ok(())
}

async fn register(app: &mut App) -> Result<()> {
    if !app.register_interactive().await? {
        return Ok(());
    }

    if let Some(notice) = app.status_message.take() {
        println!("{}", notice);
    }

    // Registration never logs the user in; hand over to the login flow
    // after the notice has been visible for a moment.
    tokio::time::sleep(Duration::from_millis(REGISTRATION_REDIRECT_DELAY_MS)).await;
    login(app).await
}

fn logout(app: &mut App) -> Result<()> {
    if app.session.is_logged_in() {
        app.logout()?;
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

fn print_profile(app: &App, profile: &UserProfile) {
    println!("User Data:");
    println!("  Last Name:  {}", profile.last_name);
    println!("  First Name: {}", profile.first_name);
    println!("  Email:      {}", profile.email);

    if let (Some(username), Some(since)) = (app.session.username(), app.session.created_at()) {
        println!();
        println!(
            "Signed in as {} since {}",
            username,
            since.format("%Y-%m-%d %H:%M UTC")
        );
    }
}
