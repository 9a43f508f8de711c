use thiserror::Error;

use crate::types::ItemId;

#[derive(Error, Debug)]
pub enum JobsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Item {0} not found")]
    NotFound(ItemId),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for JobsError {
    fn from(err: reqwest::Error) -> Self {
        JobsError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, JobsError>;
