use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("smartctl command '{command}' failed with exit code {exit_code:?}")]
    Command {
        command: String,
        exit_code: Option<i32>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported device protocol: {0}")]
    UnsupportedProtocol(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, ExporterError>;
