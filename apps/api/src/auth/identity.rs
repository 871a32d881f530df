use anyhow::{Context, Result};
use reqwest::Url;

use crate::config::Config;

const SCOPES: &str = "openid profile User.Read";

/// OAuth client registration with the identity provider.
#[derive(Debug, Clone)]
pub struct IdentityProvider {
    pub client_id: String,
    pub authority: String,
    pub redirect_uri: String,
}

impl IdentityProvider {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client_id: config.auth_client_id.clone(),
            authority: config.auth_authority.trim_end_matches('/').to_string(),
            redirect_uri: config.auth_redirect_uri.clone(),
        }
    }

    /// Authorization endpoint URL for sign-in, or account creation when `signup` is set.
    pub fn authorize_url(&self, state: &str, signup: bool) -> Result<Url> {
        let endpoint = format!("{}/oauth2/v2.0/authorize", self.authority);
        let mut params = vec![
            ("client_id", self.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("response_mode", "query"),
            ("scope", SCOPES),
            ("state", state),
        ];
        if signup {
            params.push(("prompt", "create"));
        }
        Url::parse_with_params(&endpoint, &params)
            .with_context(|| format!("Invalid identity provider authority '{}'", self.authority))
    }
}
