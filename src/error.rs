//! Error handling for wandb-watch
//!
//! The device core (codec, history, graph, animation, scrub) never fails:
//! it clamps and truncates. Errors only exist at the edges of the system,
//! where bytes, files and threads come in.

use thiserror::Error;

use crate::protocol::ProtocolError;

/// Main error type for wandb-watch operations
#[derive(Error, Debug)]
pub enum WatchError {
    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// A message could not be decoded from its wire form
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Errors related to channel communication
    #[error("Channel error: {0}")]
    Channel(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<WatchError>,
    },
}

impl WatchError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        WatchError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for WatchError {
    fn from(err: serde_json::Error) -> Self {
        WatchError::Serialization(err.to_string())
    }
}

/// Result type alias for wandb-watch operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// Extension trait for adding context to Results whose error converts
/// into [`WatchError`]
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<WatchError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
