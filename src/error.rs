//! Error types
//!
//! Provider and connector failures never escape the session controller as
//! panics. They come back as `ConnectError` so the UI can show feedback, while
//! the session itself is restored to its prior state.

use thiserror::Error;

/// Errors raised by a wallet provider or EVM connector call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("wallet provider not available")]
    Unavailable,

    #[error("request rejected by user")]
    UserRejected,

    #[error("page is not trusted by the wallet")]
    NotTrusted,

    #[error("{0}")]
    Failed(String),
}

/// Errors surfaced by `SessionController::request_connect`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("no injected wallet provider detected")]
    ProviderUnavailable,

    #[error("connection request rejected by user")]
    UserRejected,

    #[error("connection failed: {0}")]
    ConnectFailed(#[source] ProviderError),

    #[error("network switch to chain {chain_id} failed: {source}")]
    NetworkSwitchFailed {
        chain_id: u64,
        #[source]
        source: ProviderError,
    },

    #[error("connector login failed: {0}")]
    LoginFailed(#[source] ProviderError),

    #[error("a connection request is already in flight")]
    AlreadyConnecting,

    #[error("unknown wallet: {0}")]
    UnknownWallet(String),
}

impl From<ProviderError> for ConnectError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Unavailable => ConnectError::ProviderUnavailable,
            ProviderError::UserRejected => ConnectError::UserRejected,
            other => ConnectError::ConnectFailed(other),
        }
    }
}

/// Key-value persistence errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}
