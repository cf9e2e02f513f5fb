//! Error types for the rebalancer CLI.

use std::path::PathBuf;

/// All errors that can occur during a rebalancer command.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("worksheet error: {0}")]
    Worksheet(String),

    #[error("failed to write worksheet {path}: {source}")]
    WorksheetWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Import(#[from] topup::ImportError),

    #[error("{0}")]
    Validation(#[from] topup::ValidationError),

    #[error("calculation service error: {0}")]
    Transport(String),

    #[error("aborted: {0}")]
    Aborted(String),

    #[error("audit log error: {0}")]
    Audit(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
