//! In-memory sinks
//!
//! Used by embedders that want profiles as bytes, and by tests to observe
//! what the dispatcher created, wrote and closed.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use contracts::{ContractError, OutputMode, Sink, SinkFactory};

/// Shared view of one in-memory sink
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    data: Arc<Mutex<Vec<u8>>>,
    closes: Arc<AtomicUsize>,
}

impl MemoryBuffer {
    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn contents(&self) -> Vec<u8> {
        self.lock().clone()
    }

    /// Contents as UTF-8 (lossy)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Number of times the owning sink was closed
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Block until the sink is closed; false on timeout
    ///
    /// For sinks closed off the calling thread, such as continuous captures.
    pub fn wait_closed(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.closes() == 0 {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
        true
    }
}

/// Sink writing into a shared buffer
#[derive(Debug)]
pub struct MemorySink {
    name: String,
    buffer: MemoryBuffer,
}

impl MemorySink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buffer: MemoryBuffer::default(),
        }
    }

    pub fn buffer(&self) -> MemoryBuffer {
        self.buffer.clone()
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    fn close(self: Box<Self>) -> Result<(), ContractError> {
        self.buffer.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// One sink handed out by `MemorySinkFactory`
#[derive(Debug, Clone)]
pub struct MemoryCapture {
    pub profile: String,
    pub mode: OutputMode,
    pub buffer: MemoryBuffer,
}

/// Factory recording every sink it creates, in creation order
#[derive(Debug, Default)]
pub struct MemorySinkFactory {
    captures: Mutex<Vec<MemoryCapture>>,
}

impl MemorySinkFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sinks created so far
    pub fn captures(&self) -> Vec<MemoryCapture> {
        self.captures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SinkFactory for MemorySinkFactory {
    fn new_sink(&self, profile: &str, mode: &OutputMode) -> Box<dyn Sink> {
        let sink = MemorySink::new(format!("memory:{profile}"));
        self.captures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MemoryCapture {
                profile: profile.to_string(),
                mode: mode.clone(),
                buffer: sink.buffer(),
            });
        Box::new(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_records_in_order() {
        let factory = MemorySinkFactory::new();
        let mode = OutputMode::Other("orange".to_string());

        let mut first = factory.new_sink("foo", &mode);
        first.write_all(b"test foo\n").unwrap();
        first.close().unwrap();
        let _second = factory.new_sink("bar", &mode);

        let captures = factory.captures();
        assert_eq!(captures.len(), 2);
        assert_eq!(captures[0].profile, "foo");
        assert_eq!(captures[0].mode, mode);
        assert_eq!(captures[0].buffer.text(), "test foo\n");
        assert_eq!(captures[0].buffer.closes(), 1);
        assert_eq!(captures[1].profile, "bar");
        assert_eq!(captures[1].buffer.closes(), 0);
    }

    #[test]
    fn test_wait_closed_from_other_thread() {
        let sink = MemorySink::new("late");
        let buffer = sink.buffer();
        assert!(!buffer.wait_closed(Duration::from_millis(20)));

        let closer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            Box::new(sink).close().unwrap();
        });
        assert!(buffer.wait_closed(Duration::from_secs(5)));
        assert_eq!(buffer.closes(), 1);
        closer.join().unwrap();
    }
}
