//! Capture metrics
//!
//! Emitted through the `metrics` facade. No exporter is installed here; the
//! embedding application's recorder (if any) collects them.

use metrics::{counter, histogram};

/// Final status of one capture attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStatus {
    /// Point-in-time profile written and closed
    Written,
    /// Continuous profile started
    Started,
    /// Capture failed
    Failed,
}

impl CaptureStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Written => "written",
            Self::Started => "started",
            Self::Failed => "failed",
        }
    }
}

/// Record a received trigger signal
pub fn record_signal(signal: &str, recognized: bool) {
    counter!(
        "sigprof_signals_total",
        "signal" => signal.to_string(),
        "recognized" => recognized.to_string()
    )
    .increment(1);
}

/// Record the outcome of one capture attempt
pub fn record_capture(profile: &str, status: CaptureStatus) {
    counter!(
        "sigprof_captures_total",
        "profile" => profile.to_string(),
        "status" => status.as_str()
    )
    .increment(1);
}

/// Record bytes written by a point-in-time capture
pub fn record_capture_bytes(profile: &str, bytes: u64) {
    histogram!("sigprof_capture_bytes", "profile" => profile.to_string()).record(bytes as f64);
}

/// Record time spent inside the engine for one capture
pub fn record_capture_latency_ms(profile: &str, latency_ms: f64) {
    histogram!("sigprof_capture_latency_ms", "profile" => profile.to_string()).record(latency_ms);
}

/// Record a continuous capture that finished and closed its sink
pub fn record_continuous_complete(profile: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "sigprof_continuous_complete_total",
        "profile" => profile.to_string(),
        "status" => status
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(CaptureStatus::Written.as_str(), "written");
        assert_eq!(CaptureStatus::Started.as_str(), "started");
        assert_eq!(CaptureStatus::Failed.as_str(), "failed");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_signal("SIGUSR1", true);
        record_capture("heap", CaptureStatus::Written);
        record_capture_bytes("heap", 1024);
        record_capture_latency_ms("heap", 1.5);
        record_continuous_complete("cpu", true);
    }
}
