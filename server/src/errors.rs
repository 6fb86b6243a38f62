use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reading {0} not found")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("store task unavailable")]
    Channel,
}

pub type Result<T> = std::result::Result<T, Error>;
