//! Continuous CPU capture
//!
//! pprof owns a single process-wide profiler; a second `start` while one is
//! running fails immediately with `EngineStart`.

use std::io::Write;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use pprof::protos::Message;
use pprof::{ProfilerGuard, ProfilerGuardBuilder};
use tracing::{error, info, instrument};

use contracts::{discard_sink, CaptureFailure, ContractError, Sink};

/// Libraries whose frames are skipped while sampling
const BLOCKLIST: &[&str] = &["libc", "libgcc", "pthread", "vdso"];

const STOP_THREAD_NAME: &str = "sigprof-cpu";

type Handoff = (ProfilerGuard<'static>, Box<dyn Sink>);

/// Starts pprof CPU captures and stops them after a fixed duration
#[derive(Debug, Clone, Copy)]
pub struct CpuProfiler {
    frequency_hz: i32,
}

impl CpuProfiler {
    pub fn new(frequency_hz: i32) -> Self {
        Self { frequency_hz }
    }

    pub fn frequency_hz(&self) -> i32 {
        self.frequency_hz
    }

    /// Start sampling; the sink is written and closed by the stop thread
    ///
    /// # Errors
    /// `EngineStart` when a profiler is already running or the stop thread
    /// cannot be spawned; the sink is handed back untouched.
    #[instrument(
        name = "cpu_profiler_start",
        skip(self, sink),
        fields(sink = %sink.name(), frequency_hz = self.frequency_hz)
    )]
    pub fn start(
        &self,
        profile: &str,
        sink: Box<dyn Sink>,
        duration: Duration,
    ) -> Result<(), CaptureFailure> {
        // The stop thread exists before sampling begins, so every failure
        // below can still return the sink.
        let (handoff_tx, handoff_rx) = mpsc::channel::<Handoff>();
        let name = profile.to_string();
        let spawned = thread::Builder::new()
            .name(STOP_THREAD_NAME.to_string())
            .spawn(move || {
                // Sender dropped without a handoff: start failed
                if let Ok((guard, sink)) = handoff_rx.recv() {
                    stop_after(&name, guard, sink, duration);
                }
            });
        if let Err(e) = spawned {
            return Err(CaptureFailure::new(
                ContractError::engine_start(profile, format!("failed to spawn stop thread: {e}")),
                sink,
            ));
        }

        let guard = match ProfilerGuardBuilder::default()
            .frequency(self.frequency_hz)
            .blocklist(BLOCKLIST)
            .build()
        {
            Ok(guard) => guard,
            Err(e) => {
                return Err(CaptureFailure::new(
                    ContractError::engine_start(profile, e.to_string()),
                    sink,
                ))
            }
        };

        handoff_tx
            .send((guard, sink))
            .map_err(|mpsc::SendError((guard, sink))| {
                drop(guard);
                CaptureFailure::new(
                    ContractError::engine_start(profile, "stop thread exited before handoff"),
                    sink,
                )
            })?;

        info!(profile, "cpu profile started");
        Ok(())
    }
}

fn stop_after(
    profile: &str,
    guard: ProfilerGuard<'static>,
    mut sink: Box<dyn Sink>,
    duration: Duration,
) {
    thread::sleep(duration);

    let report = guard.report().build();
    // Releases the process-wide profiler
    drop(guard);

    let written = report
        .map_err(|e| e.to_string())
        .and_then(|report| encode(&report))
        .and_then(|content| {
            sink.write_all(&content)
                .and_then(|()| sink.flush())
                .map(|()| content.len())
                .map_err(|e| e.to_string())
        });

    match written {
        Ok(bytes) => {
            info!(profile, sink = %sink.name(), bytes, "cpu profile complete");
            let closed = sink.close();
            if let Err(e) = &closed {
                error!(profile, error = %e, "failed to close cpu profile");
            }
            observability::record_continuous_complete(profile, closed.is_ok());
        }
        Err(message) => {
            let err = ContractError::profile_write(profile, message);
            error!(profile, sink = %sink.name(), error = %err, "cpu profile failed");
            if let Err(e) = discard_sink(sink) {
                error!(profile, error = %e, "failed to discard cpu profile");
            }
            observability::record_continuous_complete(profile, false);
        }
    }
}

fn encode(report: &pprof::Report) -> Result<Vec<u8>, String> {
    let profile = report.pprof().map_err(|e| e.to_string())?;
    let mut content = Vec::new();
    profile.encode(&mut content).map_err(|e| e.to_string())?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatcher::MemorySink;
    use std::time::Instant;

    #[test]
    fn test_second_start_fails_while_running() {
        let profiler = CpuProfiler::new(100);

        let first = MemorySink::new("first");
        let first_state = first.buffer();
        profiler
            .start("cpu", Box::new(first), Duration::from_millis(300))
            .unwrap();
        // Still sampling: the stop thread owns the sink until the duration ends
        assert_eq!(first_state.closes(), 0);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(first_state.closes(), 0);

        let second = MemorySink::new("second");
        let second_state = second.buffer();
        let failure = profiler
            .start("cpu", Box::new(second), Duration::ZERO)
            .unwrap_err();
        assert!(matches!(failure.error, ContractError::EngineStart { .. }));
        assert_eq!(failure.sink.name(), "second");
        assert_eq!(second_state.closes(), 0);

        assert!(first_state.wait_closed(Duration::from_secs(10)));
        assert_eq!(first_state.closes(), 1);
        assert!(!first_state.contents().is_empty());

        // Slot was released before the first sink closed
        let third = MemorySink::new("third");
        let third_state = third.buffer();
        let started = Instant::now();
        profiler
            .start("cpu", Box::new(third), Duration::ZERO)
            .unwrap();
        assert!(third_state.wait_closed(Duration::from_secs(10)));
        assert_eq!(third_state.closes(), 1);
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
