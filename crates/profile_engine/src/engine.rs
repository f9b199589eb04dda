//! RuntimeProfiler - the production ProfileEngine

use tracing::{debug, instrument};

use contracts::{
    CaptureFailure, CaptureKind, CaptureOutcome, CaptureRequest, ContractError, CpuProfileConfig,
    ProfileEngine, Sink,
};

use crate::continuous::CpuProfiler;
use crate::snapshot::Snapshot;

/// Profiles the running process
///
/// The `heap` profile reads jemalloc statistics and only reflects the process
/// heap when jemalloc (e.g. `tikv-jemallocator`) is the global allocator; see
/// [`RuntimeProfiler::heap_tracks_global_allocator`].
#[derive(Debug, Clone, Copy)]
pub struct RuntimeProfiler {
    cpu: CpuProfiler,
}

impl RuntimeProfiler {
    pub fn new(cpu_frequency_hz: i32) -> Self {
        Self {
            cpu: CpuProfiler::new(cpu_frequency_hz),
        }
    }

    pub fn from_config(config: &CpuProfileConfig) -> Self {
        Self::new(config.frequency_hz)
    }

    /// Names accepted for point-in-time captures
    pub fn point_in_time_profiles() -> impl Iterator<Item = &'static str> {
        Snapshot::ALL.into_iter().map(Snapshot::name)
    }

    /// Whether the `heap` profile describes the global allocator
    ///
    /// False when jemalloc is not the global allocator or its statistics
    /// cannot be read.
    pub fn heap_tracks_global_allocator() -> bool {
        crate::snapshot::heap_tracks_global_allocator()
    }
}

impl Default for RuntimeProfiler {
    fn default() -> Self {
        Self::from_config(&CpuProfileConfig::default())
    }
}

impl ProfileEngine for RuntimeProfiler {
    #[instrument(
        name = "runtime_profiler_capture",
        skip(self, request, sink),
        fields(profile = %request.profile, sink = %sink.name())
    )]
    fn capture(
        &self,
        request: &CaptureRequest,
        mut sink: Box<dyn Sink>,
    ) -> Result<CaptureOutcome, CaptureFailure> {
        match request.kind {
            CaptureKind::Continuous(duration) => self
                .cpu
                .start(&request.profile, sink, duration)
                .map(|()| CaptureOutcome::Started),
            CaptureKind::PointInTime => {
                let Some(snapshot) = Snapshot::lookup(&request.profile) else {
                    return Err(CaptureFailure::new(
                        ContractError::unknown_profile(&request.profile),
                        sink,
                    ));
                };
                match snapshot.write_to(&mut *sink) {
                    Ok(bytes) => {
                        debug!(bytes, "profile rendered");
                        Ok(CaptureOutcome::Written { sink, bytes })
                    }
                    Err(e) => Err(CaptureFailure::new(
                        ContractError::profile_write(&request.profile, e.to_string()),
                        sink,
                    )),
                }
            }
        }
    }
}
