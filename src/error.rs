//! Error types for pagekit
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Running out of items is not an error: sequences report exhaustion with
//! `Ok(None)`, so a caller can always tell a finished listing apart from a
//! failed fetch.

use crate::types::BoxError;
use thiserror::Error;

/// The main error type for pagekit
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Paging Errors
    // ============================================================================
    #[error("Page fetch failed: {source}")]
    Fetch {
        #[source]
        source: BoxError,
    },

    #[error("Malformed response field '{field}': {message}")]
    Protocol { field: String, message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

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

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Wrap a fetcher failure, keeping the original error as the source
    pub fn fetch(source: impl Into<BoxError>) -> Self {
        Self::Fetch {
            source: source.into(),
        }
    }

    /// Create a protocol error for a response field
    pub fn protocol(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Protocol {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this error came from the page fetcher
    pub fn is_fetch(&self) -> bool {
        matches!(self, Error::Fetch { .. })
    }

    /// Check if a caller-level retry policy may try this again.
    ///
    /// Only fetch failures qualify; pagekit itself never retries.
    pub fn is_retryable(&self) -> bool {
        self.is_fetch()
    }

    /// Borrow the fetcher's original error as a concrete type
    pub fn downcast_fetch<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Error::Fetch { source } => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Result type alias for pagekit
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
