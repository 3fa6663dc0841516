//! Persistence errors

/// Failure to read or write local state
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type StateResult<T> = Result<T, StateError>;
