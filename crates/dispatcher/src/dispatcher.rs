//! Dispatcher - main loop turning signals into captures

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use contracts::{
    discard_sink, CaptureFailure, CaptureOutcome, CaptureRequest, OutputMode, ProfileEngine,
    ProfileMap, Signal, SignalSource, SigprofConfig, SinkFactory,
};
use observability::CaptureStatus;

use crate::factory::DefaultSinkFactory;
use crate::metrics::CaptureMetrics;

/// Dispatcher configuration, fixed at construction
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Signal to profile-list mapping
    pub profiles: ProfileMap,
    /// Destination of every capture
    pub output: OutputMode,
    /// Directory for file sinks
    pub output_dir: PathBuf,
    /// Length of continuous captures
    pub cpu_duration: Duration,
}

impl From<&SigprofConfig> for DispatcherConfig {
    fn from(config: &SigprofConfig) -> Self {
        Self {
            profiles: config.profile_map(),
            output: config.output.clone(),
            output_dir: config.resolved_output_dir(),
            cpu_duration: config.cpu.duration(),
        }
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self::from(&SigprofConfig::default())
    }
}

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    engine: Arc<dyn ProfileEngine>,
    sink_factory: Option<Arc<dyn SinkFactory>>,
}

impl DispatcherBuilder {
    /// Create a new DispatcherBuilder
    pub fn new(config: DispatcherConfig, engine: Arc<dyn ProfileEngine>) -> Self {
        Self {
            config,
            engine,
            sink_factory: None,
        }
    }

    /// Replace the default stdout/stderr/file factory
    pub fn sink_factory(mut self, sink_factory: Arc<dyn SinkFactory>) -> Self {
        self.sink_factory = Some(sink_factory);
        self
    }

    /// Build a dispatcher reading from `source`
    #[instrument(name = "dispatcher_builder_build", skip(self, source))]
    pub fn build<S: SignalSource>(self, source: S) -> Dispatcher<S> {
        let sink_factory = self.sink_factory.unwrap_or_else(|| {
            Arc::new(DefaultSinkFactory::new(self.config.output_dir.clone()))
        });

        Dispatcher {
            config: self.config,
            engine: self.engine,
            sink_factory,
            source,
            metrics: Arc::new(CaptureMetrics::new()),
        }
    }

    /// Build on OS signals and spawn; the returned handle stops the loop
    #[cfg(unix)]
    #[instrument(name = "dispatcher_builder_spawn", skip(self))]
    pub fn spawn_on_os_signals(
        self,
    ) -> Result<crate::handle::DispatcherHandle, crate::error::DispatcherError> {
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let source = crate::signal::OsSignalSource::new()?.with_shutdown(shutdown_rx);
        let dispatcher = self.build(source);
        let metrics = dispatcher.metrics();
        let worker = dispatcher.spawn();
        Ok(crate::handle::DispatcherHandle::new(
            shutdown_tx,
            worker,
            metrics,
        ))
    }
}

/// Drives the sink factory and profile engine for every received signal
pub struct Dispatcher<S> {
    config: DispatcherConfig,
    engine: Arc<dyn ProfileEngine>,
    sink_factory: Arc<dyn SinkFactory>,
    source: S,
    metrics: Arc<CaptureMetrics>,
}

impl<S: SignalSource> Dispatcher<S> {
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Shared capture counters
    pub fn metrics(&self) -> Arc<CaptureMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the dispatcher main loop
    ///
    /// Returns when the signal source is closed.
    #[instrument(name = "dispatcher_run", skip(self))]
    pub async fn run(mut self) {
        info!(output = %self.config.output, "Dispatcher started");

        while let Some(signal) = self.source.next_signal().await {
            self.handle_signal(signal);
        }

        info!(
            signals = self.metrics.signals(),
            captures = self.metrics.attempts(),
            "Signal source closed, dispatcher stopped"
        );
    }

    /// Spawn the dispatcher as a background task
    pub fn spawn(self) -> JoinHandle<()>
    where
        S: 'static,
    {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Capture every profile mapped to `signal`, in order
    ///
    /// Returns the number of capture attempts.
    #[instrument(name = "dispatcher_handle_signal", skip(self), fields(signal = %signal))]
    pub fn handle_signal(&self, signal: Signal) -> usize {
        self.metrics.inc_signals();
        observability::record_signal(&signal.to_string(), signal.is_trigger());

        let profiles = self.config.profiles.profiles_for(signal);
        if profiles.is_empty() {
            self.metrics.inc_ignored_signals();
            debug!("No profiles for signal, ignoring");
            return 0;
        }

        for profile in profiles {
            self.capture(profile);
        }
        profiles.len()
    }

    #[instrument(name = "dispatcher_capture", skip(self))]
    fn capture(&self, profile: &str) {
        self.metrics.inc_attempts();

        let sink = self.sink_factory.new_sink(profile, &self.config.output);
        let request = CaptureRequest::for_profile(profile, self.config.cpu_duration);

        let started = Instant::now();
        let result = self.engine.capture(&request, sink);
        observability::record_capture_latency_ms(profile, started.elapsed().as_secs_f64() * 1e3);

        match result {
            Ok(CaptureOutcome::Written { sink, bytes }) => {
                self.metrics.inc_successes();
                observability::record_capture(profile, CaptureStatus::Written);
                observability::record_capture_bytes(profile, bytes);

                let name = sink.name().to_string();
                match sink.close() {
                    Ok(()) => debug!(sink = %name, bytes, "Profile written"),
                    Err(e) => {
                        self.metrics.inc_close_failures();
                        error!(sink = %name, error = %e, "Close failed");
                    }
                }
            }
            Ok(CaptureOutcome::Started) => {
                self.metrics.inc_continuous_starts();
                observability::record_capture(profile, CaptureStatus::Started);
                info!(duration = ?self.config.cpu_duration, "Continuous profile started");
            }
            Err(CaptureFailure { error, sink }) => {
                self.metrics.inc_failures();
                observability::record_capture(profile, CaptureStatus::Failed);
                error!(sink = %sink.name(), error = %error, "Capture failed");

                match discard_sink(sink) {
                    Ok(Some(path)) => debug!(path = %path.display(), "Removed incomplete profile"),
                    Ok(None) => {}
                    Err(e) => error!(error = %e, "Cleanup failed"),
                }
            }
        }
    }
}
