//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration failed to load or validate
    #[error("Configuration is invalid: {message}")]
    ConfigInvalid { message: String },

    /// Target pid cannot receive a signal
    #[error("Invalid target pid {pid}: must be positive")]
    InvalidPid { pid: i32 },

    /// Sending the trigger failed
    #[error("Failed to send {signal} to pid {pid}: {message}")]
    SignalDelivery {
        signal: String,
        pid: i32,
        message: String,
    },
}

impl CliError {
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
        }
    }

    pub fn invalid_pid(pid: i32) -> Self {
        Self::InvalidPid { pid }
    }

    pub fn signal_delivery(
        signal: impl Into<String>,
        pid: i32,
        message: impl Into<String>,
    ) -> Self {
        Self::SignalDelivery {
            signal: signal.into(),
            pid,
            message: message.into(),
        }
    }
}
