//! Authenticator implementation
//!
//! Applies the configured credentials to outgoing requests.

use super::types::AuthConfig;
use reqwest::RequestBuilder;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Get the auth configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config {
            AuthConfig::None => req,
            AuthConfig::Bearer { token } => req.bearer_auth(token.secret()),
            AuthConfig::Supabase { key } => req
                .header("apikey", key.secret())
                .bearer_auth(key.secret()),
        }
    }
}
