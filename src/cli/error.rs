//! CLI error types and conversions

use crate::api::ApiError;
use crate::downloader::SessionError;
use crate::region::RegionError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Region error
    #[error("region error: {0}")]
    Region(#[from] RegionError),

    /// Session error
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// API error
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
