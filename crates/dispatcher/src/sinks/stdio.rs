//! Standard stream sinks
//!
//! Closing only flushes; the process streams stay open.

use std::io::{self, Write};

use contracts::{ContractError, Sink};

/// Writes profiles to the process stdout
#[derive(Debug)]
pub struct StdoutSink {
    out: io::Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for StdoutSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl Sink for StdoutSink {
    fn name(&self) -> &str {
        "stdout"
    }

    fn close(mut self: Box<Self>) -> Result<(), ContractError> {
        self.flush()
            .map_err(|e| ContractError::sink_close(self.name(), e.to_string()))
    }
}

/// Writes profiles to the process stderr
#[derive(Debug)]
pub struct StderrSink {
    out: io::Stderr,
}

impl StderrSink {
    pub fn new() -> Self {
        Self { out: io::stderr() }
    }
}

impl Default for StderrSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for StderrSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl Sink for StderrSink {
    fn name(&self) -> &str {
        "stderr"
    }

    fn close(mut self: Box<Self>) -> Result<(), ContractError> {
        self.flush()
            .map_err(|e| ContractError::sink_close(self.name(), e.to_string()))
    }
}
