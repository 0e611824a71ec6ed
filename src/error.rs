use std::io;

/// Errors raised by the city store and its repositories
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Malformed or missing fields in the caller's payload
    #[error("{0}")]
    Validation(String),

    /// Another record already owns the derived id
    #[error("{0}")]
    Conflict(String),

    /// No record matches the lookup token
    #[error("{0}")]
    NotFound(String),

    /// The backing document could not be read or written
    #[error("storage failure while {action}: {source}")]
    Storage {
        action: &'static str,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn storage(action: &'static str, source: impl Into<io::Error>) -> Self {
        Self::Storage {
            action,
            source: source.into(),
        }
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
