use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(#[from] reqwest::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid schedule expression: {0}")]
    Schedule(#[from] cron::error::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Scheduled runs retry transient upstream failures; everything else
    /// fails the cycle immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::UpstreamFetch(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
