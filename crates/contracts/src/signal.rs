//! Trigger signals and output modes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A received process notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// SIGUSR1
    User1,
    /// SIGUSR2
    User2,
    /// Anything else, carried as the raw signal number
    Other(i32),
}

impl Signal {
    /// SIGUSR1 or SIGUSR2
    pub fn is_trigger(self) -> bool {
        matches!(self, Self::User1 | Self::User2)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User1 => f.write_str("SIGUSR1"),
            Self::User2 => f.write_str("SIGUSR2"),
            Self::Other(raw) => write!(f, "signal {raw}"),
        }
    }
}

/// Where captured profiles are written
///
/// Unrecognized settings are preserved verbatim in `Other` so a custom
/// `SinkFactory` can interpret them; the default factory treats them as stderr.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutputMode {
    Stdout,
    Stderr,
    #[default]
    File,
    Other(String),
}

impl OutputMode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
            Self::File => "file",
            Self::Other(raw) => raw,
        }
    }
}

impl FromStr for OutputMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl From<String> for OutputMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "stdout" => Self::Stdout,
            "stderr" => Self::Stderr,
            "file" => Self::File,
            _ => Self::Other(value),
        }
    }
}

impl From<OutputMode> for String {
    fn from(value: OutputMode) -> Self {
        match value {
            OutputMode::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
