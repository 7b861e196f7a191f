use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Transport error: {0}")]
    Transport(#[from] ApiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}
