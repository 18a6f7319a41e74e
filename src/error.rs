//! Error types for rowferry
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for rowferry
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Remote Errors
    // ============================================================================
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Remote API error {status}: {body}")]
    RemoteApi { status: u16, body: String },

    #[error("Malformed page from '{collection}': {message}")]
    MalformedPage { collection: String, message: String },

    #[error("Insert into '{collection}' accepted but response unreadable: {message}")]
    UnreadableResponse { collection: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Key Remapping Errors
    // ============================================================================
    #[error("Unresolved reference in '{collection}': no remapped key for old id {old_id}")]
    UnresolvedReference { collection: String, old_id: String },

    #[error("Duplicate key in '{collection}': old id {old_id} already maps to {existing}, not {attempted}")]
    DuplicateKey {
        collection: String,
        old_id: i64,
        existing: i64,
        attempted: i64,
    },

    #[error("Invalid record in '{collection}': {message}")]
    InvalidRecord { collection: String, message: String },

    // ============================================================================
    // Snapshot Errors
    // ============================================================================
    #[error("Snapshot for '{collection}' not found at {path}")]
    MissingSnapshot { collection: String, path: String },

    #[error("Snapshot error: {message}")]
    Snapshot { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a remote API error from a non-2xx response
    pub fn remote_api(status: u16, body: impl Into<String>) -> Self {
        Self::RemoteApi {
            status,
            body: body.into(),
        }
    }

    /// Create a malformed page error
    pub fn malformed_page(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedPage {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Create an error for a 2xx insert whose body could not be read
    pub fn unreadable_response(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnreadableResponse {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Create an unresolved reference error
    pub fn unresolved(collection: impl Into<String>, old_id: impl ToString) -> Self {
        Self::UnresolvedReference {
            collection: collection.into(),
            old_id: old_id.to_string(),
        }
    }

    /// Create an invalid record error
    pub fn invalid_record(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Create a missing snapshot error
    pub fn missing_snapshot(collection: impl Into<String>, path: impl Into<String>) -> Self {
        Self::MissingSnapshot {
            collection: collection.into(),
            path: path.into(),
        }
    }

    /// Create a snapshot error
    pub fn snapshot(message: impl Into<String>) -> Self {
        Self::Snapshot {
            message: message.into(),
        }
    }

    /// Errors that abort a whole run instead of a single drain or record
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Config { .. } | Error::MissingSnapshot { .. } | Error::Snapshot { .. }
        )
    }

    /// The destination committed the write even though the call failed
    pub fn is_accepted_write(&self) -> bool {
        matches!(self, Error::UnreadableResponse { .. })
    }

    /// HTTP status carried by the error, if it came from a remote response
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RemoteApi { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for rowferry
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
