//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// OS signal handler registration failed
    #[error("failed to install {signal} handler: {message}")]
    SignalInstall { signal: String, message: String },

    /// Contract-level error
    #[error("contract error: {0}")]
    Contract(#[from] contracts::ContractError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatcherError {
    /// Create a signal install error
    pub fn signal_install(signal: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SignalInstall {
            signal: signal.into(),
            message: message.into(),
        }
    }
}
