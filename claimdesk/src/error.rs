use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimDeskError {
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("claim not found: {0}")]
    ClaimNotFound(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ClaimDeskError>;
