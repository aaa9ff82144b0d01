//! The two user-facing flows: register, and log in then load todos.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::api::{ApiClient, AuthClient, ClientSettings, ResourceClient};
use crate::auth::{CredentialStore, TokenStore};
use crate::config::Config;
use crate::models::{AuthResult, Credentials, LoginOutcome, ResourceResult};

/// Ties the form state, the token store and both HTTP clients together.
pub struct Session {
    form: CredentialStore,
    auth: AuthClient,
    resources: ResourceClient,
    tokens: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(settings: &ClientSettings, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let api = ApiClient::new(settings)?;
        let resources = ResourceClient::new(api.clone(), tokens.clone());
        let auth = AuthClient::new(api, tokens.clone(), resources.clone());

        Ok(Self {
            form: CredentialStore::new(),
            auth,
            resources,
            tokens,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.client_settings(), config.token_store()?)
    }

    pub fn form(&self) -> &CredentialStore {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CredentialStore {
        &mut self.form
    }

    pub async fn register_flow(&self, creds: &Credentials) -> AuthResult {
        self.auth.register(creds).await
    }

    pub async fn login_flow(&self, creds: &Credentials) -> LoginOutcome {
        self.auth.login(creds).await
    }

    /// Register with whatever is currently in the form.
    pub async fn register_flow_with_form(&self) -> AuthResult {
        self.register_flow(&self.form.get()).await
    }

    /// Log in with whatever is currently in the form.
    pub async fn login_flow_with_form(&self) -> LoginOutcome {
        self.login_flow(&self.form.get()).await
    }

    pub async fn fetch_protected(&self, path: &str) -> ResourceResult {
        self.resources.fetch_protected(path).await
    }

    pub async fn fetch_todos(&self) -> ResourceResult {
        self.resources.fetch_todos().await
    }

    pub fn has_token(&self) -> bool {
        match self.tokens.load() {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!(error = %e, "Failed to read token store");
                false
            }
        }
    }

    /// Forget the stored token. The form is left as is.
    pub fn logout(&self) -> Result<()> {
        self.tokens.clear()?;
        info!("Token cleared");
        Ok(())
    }
}
