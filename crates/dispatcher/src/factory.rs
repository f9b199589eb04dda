//! DefaultSinkFactory - stdout / stderr / uniquely named files

use std::path::{Path, PathBuf};

use tracing::{error, info, instrument};

use contracts::{ContractError, OutputMode, Sink, SinkFactory};

use crate::sinks::{FileSink, StderrSink, StdoutSink};

const FALLBACK_BINARY_NAME: &str = "sigprof";

/// Creates sinks according to the output mode
///
/// File sinks are named `<binary>.<profile>.prof.<suffix>` inside the output
/// directory. Unrecognized modes and file creation failures fall back to stderr.
#[derive(Debug, Clone)]
pub struct DefaultSinkFactory {
    output_dir: PathBuf,
    binary_name: String,
}

impl DefaultSinkFactory {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            binary_name: binary_name(),
        }
    }

    /// Override the file name prefix derived from `argv[0]`
    pub fn with_binary_name(mut self, binary_name: impl Into<String>) -> Self {
        self.binary_name = binary_name.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create a uniquely named file sink for `profile`
    pub fn create_file(&self, profile: &str) -> Result<FileSink, ContractError> {
        let prefix = format!("{}.{}.prof.", self.binary_name, profile);
        let (file, path) = tempfile::Builder::new()
            .prefix(&prefix)
            .tempfile_in(&self.output_dir)
            .map_err(|e| ContractError::sink_creation(profile, e.to_string()))?
            .keep()
            .map_err(|e| ContractError::sink_creation(profile, e.error.to_string()))?;
        Ok(FileSink::new(file, path))
    }
}

impl SinkFactory for DefaultSinkFactory {
    #[instrument(name = "sink_factory_new_sink", skip(self), fields(mode = %mode))]
    fn new_sink(&self, profile: &str, mode: &OutputMode) -> Box<dyn Sink> {
        match mode {
            OutputMode::Stdout => Box::new(StdoutSink::new()),
            OutputMode::File => match self.create_file(profile) {
                Ok(sink) => {
                    info!(
                        path = %sink.file_path().display(),
                        "writing {profile} profile to {}",
                        sink.file_path().display()
                    );
                    Box::new(sink)
                }
                Err(e) => {
                    error!(error = %e, "file sink unavailable, writing to stderr");
                    Box::new(StderrSink::new())
                }
            },
            OutputMode::Stderr | OutputMode::Other(_) => Box::new(StderrSink::new()),
        }
    }
}

/// Base name of `argv[0]`
fn binary_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_BINARY_NAME.to_string())
}
