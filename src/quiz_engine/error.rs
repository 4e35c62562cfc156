use thiserror::Error;

/// Failure to retrieve the roster resource. Fatal to session startup.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Roster resource not found: {name}")]
    NotFound { name: String },

    #[error("IO error while reading {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Roster resource {name} is not valid UTF-8")]
    InvalidEncoding { name: String },
}

/// Failure of the key-value persistence medium. Never fatal: the progress
/// store logs it and keeps working from memory.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StoreError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::Io(_) => true,
            StoreError::Unavailable { .. } => true,
            StoreError::Serialization(_) => false,
        }
    }
}
