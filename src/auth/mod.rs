//! Authentication module
//!
//! Supports: Supabase-style API keys, Bearer tokens
//!
//! Credentials are resolved once from the environment and handed to each
//! client explicitly; the `Authenticator` only stamps them onto requests.

mod authenticator;
mod credentials;
mod types;

pub use authenticator::Authenticator;
pub use credentials::Credentials;
pub use types::AuthConfig;

#[cfg(test)]
mod tests;
