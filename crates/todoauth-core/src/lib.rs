//! todoauth core library
//!
//! Client-side session management for the todo service:
//! - Registration and login with a username/password pair
//! - Durable storage of the issued bearer token (file or OS keychain)
//! - Bearer-authenticated requests to protected endpoints, with responses
//!   classified as success, rejection, or transport failure
//!
//! # Example
//!
//! ```no_run
//! use todoauth_core::{Config, Credentials, Session};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let session = Session::from_config(&Config::load()?)?;
//!
//!     let outcome = session
//!         .login_flow(&Credentials::new("alice", "secret"))
//!         .await;
//!     println!("{}", outcome.auth.message());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use api::{ApiClient, AuthClient, ClientSettings, ResourceClient, TransportError};
pub use auth::{
    CredentialStore, Field, FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore,
};
pub use config::{Config, TokenBackend};
pub use models::{AuthFailure, AuthResult, Credentials, FailureKind, LoginOutcome, ResourceResult};
pub use session::Session;
