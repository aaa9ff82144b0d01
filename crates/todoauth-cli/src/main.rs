//! todoauth - register, log in and load your todos from the terminal.
//!
//! Collects a username and password, hands them to the core session, and
//! prints what came back. All request and token handling lives in
//! `todoauth-core`.

mod prompt;

use std::io;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use todoauth_core::{Config, LoginOutcome, ResourceResult, Session};

const USAGE: &str = "Usage: todoauth <register|login|todos|logout|status>";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let command = match args.get(1) {
        Some(command) => command.as_str(),
        None => {
            eprintln!("{}", USAGE);
            return Ok(());
        }
    };

    let mut config = Config::load()?;
    config.apply_env();
    info!(base_url = %config.client_settings().base_url, "todoauth starting");

    let mut session = Session::from_config(&config)?;

    match command {
        "register" => {
            prompt::fill_form(session.form_mut(), config.last_username.as_deref())?;
            let result = session.register_flow_with_form().await;
            println!("{}", result.message());
        }
        "login" => {
            prompt::fill_form(session.form_mut(), config.last_username.as_deref())?;
            let outcome = session.login_flow_with_form().await;
            print_login(&outcome);

            if outcome.auth.is_success() {
                config.last_username = Some(session.form().get().username);
                // Re-read so env overrides are not written back to disk
                let mut stored = Config::load()?;
                stored.last_username = config.last_username.clone();
                stored.save()?;
            }
        }
        "todos" => {
            let result = session.fetch_todos().await;
            print_resource(&result)?;
        }
        "logout" => {
            session.logout()?;
            println!("Logged out");
        }
        "status" => {
            if session.has_token() {
                println!("Token stored");
            } else {
                println!("Not logged in");
            }
        }
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!("{}", USAGE);
        }
    }

    Ok(())
}

fn print_login(outcome: &LoginOutcome) {
    println!("{}", outcome.auth.message());
    if let Some(ref protected) = outcome.protected {
        if let Err(e) = print_resource(protected) {
            eprintln!("Error: {}", e);
        }
    }
}

fn print_resource(result: &ResourceResult) -> Result<()> {
    match result {
        ResourceResult::Ok { body } => {
            println!("Todos: {}", serde_json::to_string_pretty(body)?);
        }
        ResourceResult::Unauthorized { status, body } => {
            println!("Invalid response code: {}", status);
            println!("Invalid response data: {}", body);
        }
        ResourceResult::TransportFailure { error } => {
            println!("Unable to contact server: {}", error);
        }
    }
    Ok(())
}
