//! DispatcherHandle - controls a dispatcher running on OS signals

use std::fmt;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument};

use crate::metrics::CaptureMetrics;

/// Handle to a spawned dispatcher
///
/// Dropping the handle leaves the dispatcher running for the life of the
/// process; `shutdown` stops it and waits for the loop to exit.
pub struct DispatcherHandle {
    /// Fires the signal source's shutdown
    shutdown_tx: Option<oneshot::Sender<()>>,
    /// Dispatcher task handle
    worker_handle: JoinHandle<()>,
    /// Shared metrics
    metrics: Arc<CaptureMetrics>,
}

impl fmt::Debug for DispatcherHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherHandle")
            .field("running", &!self.worker_handle.is_finished())
            .field("metrics", &self.metrics.snapshot())
            .finish_non_exhaustive()
    }
}

impl DispatcherHandle {
    pub fn new(
        shutdown_tx: oneshot::Sender<()>,
        worker_handle: JoinHandle<()>,
        metrics: Arc<CaptureMetrics>,
    ) -> Self {
        Self {
            shutdown_tx: Some(shutdown_tx),
            worker_handle,
            metrics,
        }
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<CaptureMetrics> {
        &self.metrics
    }

    pub fn is_finished(&self) -> bool {
        self.worker_handle.is_finished()
    }

    /// Stop the dispatcher and wait for its loop to exit
    ///
    /// A continuous capture already running still completes on its own thread.
    #[instrument(name = "dispatcher_handle_shutdown", skip(self))]
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            // Err: the loop already ended
            let _ = tx.send(());
        }
        if let Err(e) = self.worker_handle.await {
            error!(error = ?e, "Dispatcher task panicked");
        }
        debug!("DispatcherHandle shutdown complete");
    }
}
