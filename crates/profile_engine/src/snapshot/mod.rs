//! Point-in-time profiles
//!
//! Each snapshot renders a plain-text dump whose first line names the profile.

mod heap;
mod tasks;
mod threads;

use std::io::{self, Write};

/// A profile rendered synchronously in one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snapshot {
    Threads,
    Tasks,
    Heap,
}

impl Snapshot {
    pub const ALL: [Snapshot; 3] = [Snapshot::Threads, Snapshot::Tasks, Snapshot::Heap];

    /// Look a profile up by its configured name
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Threads => "threads",
            Self::Tasks => "tasks",
            Self::Heap => "heap",
        }
    }

    /// Render into `writer`, returning the number of bytes written
    pub fn write_to<W: Write + ?Sized>(self, writer: &mut W) -> io::Result<u64> {
        let mut out = CountingWriter::new(writer);
        match self {
            Self::Threads => threads::write_profile(&mut out)?,
            Self::Tasks => tasks::write_profile(&mut out)?,
            Self::Heap => heap::write_profile(&mut out)?,
        }
        out.flush()?;
        Ok(out.written)
    }
}

pub(crate) fn heap_tracks_global_allocator() -> bool {
    heap::global_allocator_is_jemalloc().unwrap_or(false)
}

fn write_timestamp<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    writeln!(out, "# captured at {}", chrono::Utc::now().to_rfc3339())?;
    writeln!(out, "# pid {}", std::process::id())
}

struct CountingWriter<'a, W: ?Sized> {
    inner: &'a mut W,
    written: u64,
}

impl<'a, W: ?Sized> CountingWriter<'a, W> {
    fn new(inner: &'a mut W) -> Self {
        Self { inner, written: 0 }
    }
}

impl<W: Write + ?Sized> Write for CountingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
