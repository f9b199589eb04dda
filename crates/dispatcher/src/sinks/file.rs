//! FileSink - one profile per file

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use contracts::{ContractError, Sink};

/// Buffered file destination that remembers its path for cleanup
#[derive(Debug)]
pub struct FileSink {
    name: String,
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileSink {
    /// Wrap an already created file
    pub fn new(file: File, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            path,
            writer: BufWriter::new(file),
        }
    }

    #[cfg(test)]
    fn create(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = File::create(&path)?;
        Ok(Self::new(file, path))
    }

    pub fn file_path(&self) -> &Path {
        &self.path
    }
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn close(self: Box<Self>) -> Result<(), ContractError> {
        let Self { name, writer, .. } = *self;
        let file = writer
            .into_inner()
            .map_err(|e| ContractError::sink_close(&name, e.error().to_string()))?;
        file.sync_all()
            .map_err(|e| ContractError::sink_close(&name, e.to_string()))
    }
}
