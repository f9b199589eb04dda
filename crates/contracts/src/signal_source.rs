//! SignalSource trait - asynchronous sequence of received notifications
//!
//! The OS-backed source lives in the dispatcher crate; tests drive the
//! dispatcher through a plain `mpsc::Receiver<Signal>`.

use tokio::sync::mpsc;

use crate::Signal;

/// Trigger notification source
///
/// `None` means the source is closed and the consumer should stop.
#[trait_variant::make(SignalSource: Send)]
pub trait LocalSignalSource {
    /// Wait for the next notification
    async fn next_signal(&mut self) -> Option<Signal>;
}

impl SignalSource for mpsc::Receiver<Signal> {
    async fn next_signal(&mut self) -> Option<Signal> {
        self.recv().await
    }
}
