//! Layered error definitions
//!
//! Categorized by source: config / sink / engine

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sink Errors =====
    /// Destination could not be created
    #[error("failed to create sink for {profile} profile: {message}")]
    SinkCreation { profile: String, message: String },

    /// Closing a completed sink failed
    #[error("error closing sink '{sink_name}': {message}")]
    SinkClose { sink_name: String, message: String },

    /// Removing a discarded file failed
    #[error("cleanup error removing file {path}: {message}")]
    SinkCleanup { path: String, message: String },

    // ===== Engine Errors =====
    /// Profile name not known to the engine
    #[error("failed to lookup profile {profile:?}")]
    UnknownProfile { profile: String },

    /// Continuous capture could not be started
    #[error("failed to start {profile} profiling: {message}")]
    EngineStart { profile: String, message: String },

    /// Rendering into the sink failed
    #[error("failed to write {profile} profile: {message}")]
    ProfileWrite { profile: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create sink creation error
    pub fn sink_creation(profile: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            profile: profile.into(),
            message: message.into(),
        }
    }

    /// Create sink close error
    pub fn sink_close(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkClose {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create sink cleanup error
    pub fn sink_cleanup(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCleanup {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create unknown profile error
    pub fn unknown_profile(profile: impl Into<String>) -> Self {
        Self::UnknownProfile {
            profile: profile.into(),
        }
    }

    /// Create engine start error
    pub fn engine_start(profile: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EngineStart {
            profile: profile.into(),
            message: message.into(),
        }
    }

    /// Create profile write error
    pub fn profile_write(profile: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProfileWrite {
            profile: profile.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_profile() {
        let err = ContractError::unknown_profile("nope");
        assert_eq!(err.to_string(), "failed to lookup profile \"nope\"");

        let err = ContractError::engine_start("cpu", "profiler is running");
        assert!(err.to_string().contains("cpu"));
        assert!(err.to_string().contains("profiler is running"));
    }
}
