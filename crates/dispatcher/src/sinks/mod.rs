//! Sink implementations
//!
//! Contains StdoutSink, StderrSink, FileSink, and MemorySink.

mod file;
mod memory;
mod stdio;

pub use self::file::FileSink;
pub use self::memory::{MemoryBuffer, MemoryCapture, MemorySink, MemorySinkFactory};
pub use self::stdio::{StderrSink, StdoutSink};
