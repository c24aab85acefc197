use thiserror::Error;

/// Application-wide error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("wg-easy {operation} failed with status {status}")]
    Provider { operation: &'static str, status: u16 },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected wg-easy response: {0}")]
    InvalidResponse(String),

    #[error("QR rendering failed: {0}")]
    Render(String),

    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    pub fn provider(operation: &'static str, status: reqwest::StatusCode) -> Self {
        Self::Provider {
            operation,
            status: status.as_u16(),
        }
    }

    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// True for connection failures and timeouts.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
