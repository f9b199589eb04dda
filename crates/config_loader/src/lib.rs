//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Apply `SIGPROF_*` environment overrides
//! - Validate configuration legality
//! - Generate `SigprofConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//!
//! let config = ConfigLoader::from_env().unwrap();
//! println!("SIGUSR1 captures: {:?}", config.usr1);
//! ```

mod env;
mod parser;
mod validator;

pub use contracts::SigprofConfig;
pub use env::{
    split_profiles, ENV_CONFIG, ENV_CPU_DURATION, ENV_CPU_FREQUENCY, ENV_DIR, ENV_OUT, ENV_USR1,
    ENV_USR2,
};
pub use parser::ConfigFormat;
pub use validator::MAX_CPU_FREQUENCY_HZ;

use contracts::ContractError;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Configuration loader
///
/// Provides static methods to load configuration from files, strings or the environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the process environment
    ///
    /// `SIGPROF_CONFIG` names an optional file loaded first; the other
    /// `SIGPROF_*` variables override it.
    ///
    /// # Errors
    /// - File read / parse failure
    /// - Malformed numeric variable
    /// - Validation failure
    pub fn from_env() -> Result<SigprofConfig, ContractError> {
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit variable set
    pub fn from_vars<I, K, V>(vars: I) -> Result<SigprofConfig, ContractError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let base = match vars.get(ENV_CONFIG).filter(|p| !p.is_empty()) {
            Some(path) => {
                debug!(path = %path, "loading sigprof config file");
                Self::parse_file(Path::new(path))?
            }
            None => SigprofConfig::default(),
        };
        Self::with_overrides(base, &vars)
    }

    /// Load configuration from file path, then apply environment overrides
    pub fn load_with_env(path: &Path) -> Result<SigprofConfig, ContractError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::with_overrides(Self::parse_file(path)?, &vars)
    }

    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<SigprofConfig, ContractError> {
        let config = Self::parse_file(path)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<SigprofConfig, ContractError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Validate an already-built configuration
    pub fn validate(config: &SigprofConfig) -> Result<(), ContractError> {
        validator::validate(config)
    }

    /// Serialize SigprofConfig to TOML string
    pub fn to_toml(config: &SigprofConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize SigprofConfig to JSON string
    pub fn to_json(config: &SigprofConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    fn parse_file(path: &Path) -> Result<SigprofConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        parser::parse(&content, format)
    }

    fn with_overrides(
        mut config: SigprofConfig,
        vars: &HashMap<String, String>,
    ) -> Result<SigprofConfig, ContractError> {
        env::apply_overrides(&mut config, vars)?;
        validator::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::OutputMode;
    use std::io::Write;

    #[test]
    fn test_from_vars_defaults() {
        let config = ConfigLoader::from_vars(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config, SigprofConfig::default());
    }

    #[test]
    fn test_from_vars_lists() {
        let config = ConfigLoader::from_vars([
            (ENV_USR1, "foo,bar"),
            (ENV_USR2, "baz,quux"),
            (ENV_OUT, "orange"),
        ])
        .unwrap();
        assert_eq!(config.usr1, vec!["foo", "bar"]);
        assert_eq!(config.usr2, vec!["baz", "quux"]);
        assert_eq!(config.output, OutputMode::Other("orange".into()));
    }

    #[test]
    fn test_from_vars_only_commas_fails_validation() {
        let result = ConfigLoader::from_vars([(ENV_USR1, ",,")]);
        assert!(matches!(
            result,
            Err(ContractError::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_from_vars_rejects_unrepresentable_duration() {
        let err = ConfigLoader::from_vars([(ENV_CPU_DURATION, "1e20")]).unwrap_err();
        assert!(err.to_string().contains("cpu.duration_secs"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "usr1 = [\"cpu\"]\noutput = \"stdout\"\n[cpu]\nduration_secs = 2.0"
        )
        .unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let config =
            ConfigLoader::from_vars([(ENV_CONFIG, path.as_str()), (ENV_OUT, "stderr")]).unwrap();
        assert_eq!(config.usr1, vec!["cpu"]);
        assert_eq!(config.output, OutputMode::Stderr);
        assert_eq!(config.cpu.duration_secs, 2.0);
    }

    #[test]
    fn test_load_from_path_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = ConfigLoader::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn test_round_trip_toml() {
        let config = ConfigLoader::from_vars([(ENV_USR1, "threads,cpu")]).unwrap();
        let serialized = ConfigLoader::to_toml(&config).unwrap();
        let parsed = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let result = ConfigLoader::load_from_str("usr1 = []", ConfigFormat::Toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }
}
