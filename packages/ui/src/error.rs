use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Blog {0} is not in the local list")]
    NotFound(String),

    #[error("Blog {0} already has a request in flight")]
    Busy(String),

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Session encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}
