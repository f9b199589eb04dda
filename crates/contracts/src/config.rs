//! SigprofConfig - Config Loader output
//!
//! Describes which profiles each trigger captures and where they are written.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::{OutputMode, Signal};

/// Profile captured on SIGUSR1 when nothing is configured
pub const DEFAULT_USR1_PROFILE: &str = "threads";

/// Profile captured on SIGUSR2 when nothing is configured
pub const DEFAULT_USR2_PROFILE: &str = "heap";

/// Complete dispatcher configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigprofConfig {
    /// Profiles captured on SIGUSR1, in order
    #[serde(default = "default_usr1")]
    pub usr1: Vec<String>,

    /// Profiles captured on SIGUSR2, in order
    #[serde(default = "default_usr2")]
    pub usr2: Vec<String>,

    /// Destination of every capture
    #[serde(default)]
    pub output: OutputMode,

    /// Directory for file sinks (None = OS temp dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Continuous CPU capture settings
    #[serde(default)]
    pub cpu: CpuProfileConfig,
}

fn default_usr1() -> Vec<String> {
    vec![DEFAULT_USR1_PROFILE.to_string()]
}

fn default_usr2() -> Vec<String> {
    vec![DEFAULT_USR2_PROFILE.to_string()]
}

impl Default for SigprofConfig {
    fn default() -> Self {
        Self {
            usr1: default_usr1(),
            usr2: default_usr2(),
            output: OutputMode::default(),
            output_dir: None,
            cpu: CpuProfileConfig::default(),
        }
    }
}

impl SigprofConfig {
    /// Signal to profile-list mapping
    pub fn profile_map(&self) -> ProfileMap {
        ProfileMap::new(self.usr1.clone(), self.usr2.clone())
    }

    /// Resolved file sink directory
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// CPU profile settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpuProfileConfig {
    /// Capture length in seconds, >= 0
    #[serde(default = "default_cpu_duration_secs")]
    pub duration_secs: f64,

    /// Sampling frequency (Hz)
    #[serde(default = "default_cpu_frequency_hz")]
    pub frequency_hz: i32,
}

fn default_cpu_duration_secs() -> f64 {
    30.0
}

fn default_cpu_frequency_hz() -> i32 {
    100
}

impl Default for CpuProfileConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_cpu_duration_secs(),
            frequency_hz: default_cpu_frequency_hz(),
        }
    }
}

impl CpuProfileConfig {
    /// Capture length; zero for values validation rejects
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_secs).unwrap_or(Duration::ZERO)
    }
}

/// Immutable signal to profile-list mapping
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileMap {
    usr1: Vec<String>,
    usr2: Vec<String>,
}

impl ProfileMap {
    pub fn new(usr1: Vec<String>, usr2: Vec<String>) -> Self {
        Self { usr1, usr2 }
    }

    /// Profiles for a signal, in capture order (empty for unrecognized signals)
    pub fn profiles_for(&self, signal: Signal) -> &[String] {
        match signal {
            Signal::User1 => &self.usr1,
            Signal::User2 => &self.usr2,
            Signal::Other(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SigprofConfig::default();
        assert_eq!(config.usr1, vec!["threads"]);
        assert_eq!(config.usr2, vec!["heap"]);
        assert_eq!(config.output, OutputMode::File);
        assert_eq!(config.cpu.duration(), Duration::from_secs(30));
        assert_eq!(config.cpu.frequency_hz, 100);
    }

    #[test]
    fn test_profile_map_lookup() {
        let map = ProfileMap::new(
            vec!["foo".into(), "bar".into(), "foo".into()],
            vec!["baz".into()],
        );
        assert_eq!(map.profiles_for(Signal::User1), ["foo", "bar", "foo"]);
        assert_eq!(map.profiles_for(Signal::User2), ["baz"]);
        assert!(map.profiles_for(Signal::Other(1)).is_empty());
    }

    #[test]
    fn test_negative_duration_collapses_to_zero() {
        let cpu = CpuProfileConfig {
            duration_secs: -1.0,
            frequency_hz: 100,
        };
        assert_eq!(cpu.duration(), Duration::ZERO);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SigprofConfig = serde_json::from_str(r#"{ "usr1": ["cpu"] }"#).unwrap();
        assert_eq!(config.usr1, vec!["cpu"]);
        assert_eq!(config.usr2, vec!["heap"]);
        assert_eq!(config.output, OutputMode::File);
    }
}
