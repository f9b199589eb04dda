//! Capture metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one dispatcher
#[derive(Debug, Default)]
pub struct CaptureMetrics {
    /// Signals received (recognized or not)
    signals: AtomicU64,
    /// Signals with no profile list
    ignored_signals: AtomicU64,
    /// Captures attempted
    attempts: AtomicU64,
    /// Point-in-time captures written
    successes: AtomicU64,
    /// Captures that failed
    failures: AtomicU64,
    /// Continuous captures started
    continuous_starts: AtomicU64,
    /// Completed sinks that failed to close
    close_failures: AtomicU64,
}

impl CaptureMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> u64 {
        self.signals.load(Ordering::Relaxed)
    }

    pub fn inc_signals(&self) {
        self.signals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn ignored_signals(&self) -> u64 {
        self.ignored_signals.load(Ordering::Relaxed)
    }

    pub fn inc_ignored_signals(&self) {
        self.ignored_signals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    pub fn inc_attempts(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    pub fn inc_successes(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn inc_failures(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn continuous_starts(&self) -> u64 {
        self.continuous_starts.load(Ordering::Relaxed)
    }

    pub fn inc_continuous_starts(&self) {
        self.continuous_starts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn close_failures(&self) -> u64 {
        self.close_failures.load(Ordering::Relaxed)
    }

    pub fn inc_close_failures(&self) {
        self.close_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            signals: self.signals(),
            ignored_signals: self.ignored_signals(),
            attempts: self.attempts(),
            successes: self.successes(),
            failures: self.failures(),
            continuous_starts: self.continuous_starts(),
            close_failures: self.close_failures(),
        }
    }
}

/// Snapshot of capture metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub signals: u64,
    pub ignored_signals: u64,
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub continuous_starts: u64,
    pub close_failures: u64,
}
