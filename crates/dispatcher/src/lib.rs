//! # Dispatcher
//!
//! Signal-driven capture loop.
//!
//! Responsibilities:
//! - Consume trigger `Signal`s from a `SignalSource`
//! - Resolve each signal to its ordered profile list
//! - Create one sink per capture and clean it up after the engine returns

pub mod dispatcher;
pub mod error;
pub mod factory;
pub mod handle;
pub mod metrics;
#[cfg(unix)]
pub mod signal;
pub mod sinks;

pub use contracts::{ProfileEngine, Signal, SignalSource, Sink, SinkFactory};
pub use dispatcher::{Dispatcher, DispatcherBuilder, DispatcherConfig};
pub use error::DispatcherError;
pub use factory::DefaultSinkFactory;
pub use handle::DispatcherHandle;
pub use metrics::{CaptureMetrics, MetricsSnapshot};
#[cfg(unix)]
pub use signal::OsSignalSource;
pub use sinks::{
    FileSink, MemoryBuffer, MemoryCapture, MemorySink, MemorySinkFactory, StderrSink, StdoutSink,
};
