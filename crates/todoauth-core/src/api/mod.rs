//! HTTP clients for the todo service.
//!
//! - `ApiClient`: shared connection pool, base URL and timeout
//! - `AuthClient`: `/register` and `/login`, with the login cascade
//! - `ResourceClient`: bearer-authenticated GETs to protected endpoints
//!
//! Registration and login send the credentials as a JSON body. Protected
//! endpoints receive the stored token as an `Authorization: Bearer` header.

pub mod auth;
pub mod client;
pub mod error;
pub mod resource;

pub use auth::AuthClient;
pub use client::{ApiClient, ClientSettings};
pub use error::{ApiError, TransportError};
pub use resource::ResourceClient;
