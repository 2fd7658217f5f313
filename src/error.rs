use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed page snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid utc_offset {0:?}, expected +HH:MM or -HH:MM")]
    Offset(String),
    #[error("refresh task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
