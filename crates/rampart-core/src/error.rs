use thiserror::Error;

/// Top-level error type for the Rampart platform.
#[derive(Error, Debug)]
pub enum RampartError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
