//! Common error types for songbook

use thiserror::Error;

/// Common result type for songbook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the songbook crates
#[derive(Error, Debug)]
pub enum Error {
    /// Store operation failed; `context` names the operation
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A stored release date could not be read back as a calendar date
    #[error("Invalid stored release date {value:?}: {source}")]
    InvalidStoredDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested song does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid caller input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Wrap a store failure with the operation that produced it
    pub fn store(context: &'static str, source: sqlx::Error) -> Self {
        Error::Store { context, source }
    }

    /// Sentinel for a song id that matched no row
    pub fn song_not_found(id: i64) -> Self {
        Error::NotFound(format!("no song found with id {}", id))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
