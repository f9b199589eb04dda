//! Installer errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SigprofError {
    /// `install` was called outside a tokio runtime
    #[error("sigprof must be installed from within a tokio runtime")]
    NoRuntime,

    /// Configuration could not be loaded or is invalid
    #[error("invalid sigprof configuration: {0}")]
    Config(#[from] contracts::ContractError),

    /// The dispatcher could not be started
    #[error(transparent)]
    Dispatcher(#[from] dispatcher::DispatcherError),
}
