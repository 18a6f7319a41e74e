//! Auth configuration types

use super::credentials::Credentials;

/// Authentication configuration
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: Credentials,
    },

    /// Supabase REST: the key goes both in `apikey` and as a bearer token
    Supabase {
        /// Service-role or anon key
        key: Credentials,
    },
}

impl AuthConfig {
    /// Bearer token auth
    pub fn bearer(token: Credentials) -> Self {
        Self::Bearer { token }
    }

    /// Supabase `apikey` + bearer auth
    pub fn supabase(key: Credentials) -> Self {
        Self::Supabase { key }
    }

    /// Check if this config requires any authentication
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
