//! Error handling for the bpuc CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Graph model error
    #[error("Model error: {0}")]
    Model(#[from] bpu_model::ModelError),

    /// Hardware description error
    #[error("Hardware error: {0}")]
    Hal(#[from] bpu_hal::HalError),

    /// Compilation error
    #[error("Compile error: {0}")]
    Compile(#[from] bpu_compiler::CompileError),

    /// Stream format error
    #[error("Stream error: {0}")]
    Stream(#[from] bpu_stream::StreamError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("Hardware file error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parse error
    #[error("Graph file error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("Error: {0}")]
    Generic(#[from] anyhow::Error),

    /// Invalid command arguments
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }
}
