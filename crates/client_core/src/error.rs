use thiserror::Error;

/// Failure modes of a backend request, as seen by the controllers.
///
/// `Malformed` exists so an unexpected response shape surfaces the same way a
/// transport failure does instead of panicking a lifecycle.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, BackendError>;
