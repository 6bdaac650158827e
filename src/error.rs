use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrewkeeperError {
    #[error("Homebrew execution failed: {0}")]
    BrewExecution(String),

    #[error("Invalid package manager payload: {0}")]
    InvalidPayload(String),

    #[error("Profile store error: {0}")]
    ProfileStore(String),

    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("Path validation failed: {0}")]
    PathValidation(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BrewkeeperError>;
