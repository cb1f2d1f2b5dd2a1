use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Desk(#[from] claimdesk::ClaimDeskError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("terminal error: {0}")]
    Terminal(String),

    #[error("claim {0} is not on the selected page")]
    ClaimNotListed(String),

    #[error("{0}")]
    Resolution(String),

    #[error("aborted")]
    Aborted,
}
