//! OsSignalSource - SIGUSR1 / SIGUSR2 from the operating system

use tokio::signal::unix::{signal, Signal as UnixSignal, SignalKind};
use tokio::sync::oneshot;
use tracing::debug;

use contracts::{Signal, SignalSource};

use crate::error::DispatcherError;

/// Receives trigger signals delivered to this process
///
/// Ends when its shutdown receiver fires. Dropping the paired sender
/// without sending leaves the source running.
pub struct OsSignalSource {
    usr1: UnixSignal,
    usr2: UnixSignal,
    shutdown: Option<oneshot::Receiver<()>>,
    stopped: bool,
}

enum Event {
    Received(Signal),
    Stop,
    Detach,
}

impl OsSignalSource {
    /// Register handlers; must be called inside a tokio runtime
    pub fn new() -> Result<Self, DispatcherError> {
        let usr1 = signal(SignalKind::user_defined1())
            .map_err(|e| DispatcherError::signal_install("SIGUSR1", e.to_string()))?;
        let usr2 = signal(SignalKind::user_defined2())
            .map_err(|e| DispatcherError::signal_install("SIGUSR2", e.to_string()))?;
        Ok(Self {
            usr1,
            usr2,
            shutdown: None,
            stopped: false,
        })
    }

    /// Stop the source when `shutdown` receives a value
    pub fn with_shutdown(mut self, shutdown: oneshot::Receiver<()>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    async fn next_event(&mut self) -> Event {
        let Self {
            usr1,
            usr2,
            shutdown,
            ..
        } = self;
        match shutdown.as_mut() {
            Some(shutdown) => tokio::select! {
                res = shutdown => if res.is_ok() { Event::Stop } else { Event::Detach },
                Some(()) = usr1.recv() => Event::Received(Signal::User1),
                Some(()) = usr2.recv() => Event::Received(Signal::User2),
                else => Event::Stop,
            },
            None => tokio::select! {
                Some(()) = usr1.recv() => Event::Received(Signal::User1),
                Some(()) = usr2.recv() => Event::Received(Signal::User2),
                else => Event::Stop,
            },
        }
    }
}

impl SignalSource for OsSignalSource {
    async fn next_signal(&mut self) -> Option<Signal> {
        while !self.stopped {
            match self.next_event().await {
                Event::Received(signal) => return Some(signal),
                Event::Stop => {
                    self.shutdown = None;
                    self.stopped = true;
                }
                Event::Detach => {
                    debug!("shutdown sender dropped, signal source stays active");
                    self.shutdown = None;
                }
            }
        }
        None
    }
}
