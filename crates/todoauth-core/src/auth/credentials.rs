use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::models::Credentials;

/// Form field a value is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Password,
}

impl FromStr for Field {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "username" => Ok(Field::Username),
            "password" => Ok(Field::Password),
            other => Err(anyhow!("Unknown credential field: {}", other)),
        }
    }
}

/// Holds the username/password pair while the user is typing it.
///
/// Nothing here is validated or persisted, and submitting does not clear it.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    current: Credentials,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Username => &mut self.current.username,
            Field::Password => &mut self.current.password,
        };
        *slot = value.into();
    }

    /// Bind by the input's `name` attribute ("username" or "password").
    pub fn set_by_name(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let field: Field = name.parse()?;
        self.set(field, value);
        Ok(())
    }

    pub fn get(&self) -> Credentials {
        self.current.clone()
    }
}
