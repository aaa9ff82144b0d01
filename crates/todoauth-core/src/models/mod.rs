//! Data models for the session lifecycle.
//!
//! - `Credentials`: the username/password pair collected from the user
//! - `AuthResult`, `AuthFailure`, `FailureKind`: outcome of register/login
//! - `LoginOutcome`: login result plus the protected fetch it cascades into
//! - `ResourceResult`: outcome of a protected fetch

pub mod auth;
pub mod resource;

pub use auth::{AuthFailure, AuthResult, Credentials, FailureKind, LoginOutcome};
pub use resource::ResourceResult;
