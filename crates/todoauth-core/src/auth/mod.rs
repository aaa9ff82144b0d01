//! Local session state: the credentials being typed and the stored token.
//!
//! This module provides:
//! - `CredentialStore`: in-memory username/password form state
//! - `TokenStore`: durable single-token storage under the `jwt` key, with
//!   file, OS keychain, and in-memory implementations

pub mod credentials;
pub mod keychain;
pub mod token;

pub use credentials::{CredentialStore, Field};
pub use keychain::KeyringTokenStore;
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
