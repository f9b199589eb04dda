//! # sigprof
//!
//! Capture runtime profiles of a running process by sending it SIGUSR1 or
//! SIGUSR2.
//!
//! ```no_run
//! # async fn run() -> Result<(), sigprof::SigprofError> {
//! // SIGPROF_USR1=threads,tasks SIGPROF_USR2=heap,cpu SIGPROF_OUT=file
//! let handle = sigprof::install_from_env()?;
//! // ... application runs; `kill -USR1 <pid>` writes profiles ...
//! handle.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod error;

use std::sync::Arc;

use tracing::{info, warn};

pub use config_loader::ConfigLoader;
pub use contracts::{CpuProfileConfig, OutputMode, Signal, SigprofConfig};
pub use dispatcher::{DispatcherHandle, MetricsSnapshot};
pub use error::SigprofError;
pub use profile_engine::RuntimeProfiler;

use dispatcher::{DispatcherBuilder, DispatcherConfig};

/// Start capturing profiles on SIGUSR1 / SIGUSR2
///
/// Must be called from within a tokio runtime. Dropping the returned handle
/// leaves the dispatcher running.
///
/// The `heap` profile reads jemalloc statistics; install `tikv-jemallocator`
/// as the global allocator for it to describe the process heap. A warning is
/// logged when `heap` is configured without it.
///
/// # Errors
/// Invalid configuration, no runtime, or signal handler registration failure.
pub fn install(config: SigprofConfig) -> Result<DispatcherHandle, SigprofError> {
    ConfigLoader::validate(&config)?;
    if tokio::runtime::Handle::try_current().is_err() {
        return Err(SigprofError::NoRuntime);
    }

    if uses_heap(&config) && !RuntimeProfiler::heap_tracks_global_allocator() {
        warn!("jemalloc is not the global allocator; heap profiles cover jemalloc arenas only");
    }

    let engine = Arc::new(RuntimeProfiler::from_config(&config.cpu));
    let handle = DispatcherBuilder::new(DispatcherConfig::from(&config), engine)
        .spawn_on_os_signals()?;

    info!(
        usr1 = ?config.usr1,
        usr2 = ?config.usr2,
        output = %config.output,
        "sigprof installed"
    );
    Ok(handle)
}

fn uses_heap(config: &SigprofConfig) -> bool {
    config.usr1.iter().chain(&config.usr2).any(|p| p == "heap")
}

/// `install` with configuration read from `SIGPROF_*` variables
pub fn install_from_env() -> Result<DispatcherHandle, SigprofError> {
    install(ConfigLoader::from_env()?)
}
