//! Capture requests, outcomes and the ProfileEngine trait

use std::fmt;
use std::time::Duration;

use crate::{ContractError, Sink};

/// Name of the only continuous profile
pub const CPU_PROFILE: &str = "cpu";

/// How a profile is collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// Rendered synchronously in one call
    PointInTime,
    /// Sampled for the given duration, then written by the engine
    Continuous(Duration),
}

/// One request to render a named profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub profile: String,
    pub kind: CaptureKind,
}

impl CaptureRequest {
    /// Classify a profile name; only `cpu` is continuous
    pub fn for_profile(profile: impl Into<String>, cpu_duration: Duration) -> Self {
        let profile = profile.into();
        let kind = if profile == CPU_PROFILE {
            CaptureKind::Continuous(cpu_duration)
        } else {
            CaptureKind::PointInTime
        };
        Self { profile, kind }
    }

    pub fn is_continuous(&self) -> bool {
        matches!(self.kind, CaptureKind::Continuous(_))
    }
}

/// Successful capture
pub enum CaptureOutcome {
    /// Point-in-time profile fully written; the caller closes the sink
    Written { sink: Box<dyn Sink>, bytes: u64 },
    /// Continuous capture running; the engine closes the sink when it stops
    Started,
}

impl fmt::Debug for CaptureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Written { sink, bytes } => f
                .debug_struct("Written")
                .field("sink", &sink.name())
                .field("bytes", bytes)
                .finish(),
            Self::Started => f.write_str("Started"),
        }
    }
}

/// Failed capture; the sink is always handed back for cleanup
pub struct CaptureFailure {
    pub error: ContractError,
    pub sink: Box<dyn Sink>,
}

impl CaptureFailure {
    pub fn new(error: ContractError, sink: Box<dyn Sink>) -> Self {
        Self { error, sink }
    }
}

impl fmt::Debug for CaptureFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureFailure")
            .field("error", &self.error)
            .field("sink", &self.sink.name())
            .finish()
    }
}

/// Renders named profiles into sinks
pub trait ProfileEngine: Send + Sync {
    /// Run one capture
    ///
    /// # Errors
    /// Returns the failure together with the untouched-or-partial sink
    fn capture(
        &self,
        request: &CaptureRequest,
        sink: Box<dyn Sink>,
    ) -> Result<CaptureOutcome, CaptureFailure>;
}
