//! Sink traits - profile destination interface
//!
//! A sink is created for exactly one capture and closed exactly once.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{ContractError, OutputMode};

/// Profile destination
///
/// `close` consumes the sink, so a closed sink can neither be written nor closed again.
pub trait Sink: Write + Send {
    /// Human-readable name (used for logging)
    fn name(&self) -> &str;

    /// Backing file, if the sink is file-backed and removable
    fn path(&self) -> Option<&Path> {
        None
    }

    /// Flush and release the destination
    ///
    /// # Errors
    /// Returns close error (should include sink name)
    fn close(self: Box<Self>) -> Result<(), ContractError>;
}

/// Creates one sink per capture
pub trait SinkFactory: Send + Sync {
    /// Never fails: creation problems degrade to a fallback sink
    fn new_sink(&self, profile: &str, mode: &OutputMode) -> Box<dyn Sink>;
}

/// Close a sink whose content is incomplete, then remove its file (if any)
///
/// Removal is attempted even when closing fails; the close error wins when both fail.
pub fn discard_sink(sink: Box<dyn Sink>) -> Result<Option<PathBuf>, ContractError> {
    let path = sink.path().map(Path::to_path_buf);
    let closed = sink.close();
    let removed = match &path {
        Some(path) => std::fs::remove_file(path)
            .map_err(|e| ContractError::sink_cleanup(path.display().to_string(), e.to_string())),
        None => Ok(()),
    };
    closed.and(removed).map(|()| path)
}
