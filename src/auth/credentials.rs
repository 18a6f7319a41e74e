//! Credential resolution
//!
//! A key is read from the first non-empty of several environment variables.
//! A missing key is a startup-time configuration error.

use crate::error::{Error, Result};
use std::fmt;

/// An API key or bearer token.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    secret: String,
    source: String,
}

impl Credentials {
    /// Wrap a literal secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            source: "literal".to_string(),
        }
    }

    /// Resolve from the process environment, first non-empty variable wins
    pub fn from_env<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        Self::resolve_with(names, |name| std::env::var(name).ok())
    }

    /// Resolve through an arbitrary lookup, first non-empty (after trim) wins
    pub fn resolve_with<S, F>(names: &[S], lookup: F) -> Result<Self>
    where
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        for name in names {
            let name = name.as_ref();
            if let Some(value) = lookup(name) {
                let value = value.trim();
                if !value.is_empty() {
                    return Ok(Self {
                        secret: value.to_string(),
                        source: name.to_string(),
                    });
                }
            }
        }

        let tried: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        if tried.is_empty() {
            return Err(Error::config("No credential variables configured"));
        }
        Err(Error::config(format!(
            "Set {} in the environment",
            tried.join(" or ")
        )))
    }

    /// The secret value
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Where the secret came from (variable name or "literal")
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
