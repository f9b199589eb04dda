//! Environment variable overrides
//!
//! Empty variables mean "keep the current value".

use std::collections::HashMap;
use std::path::PathBuf;

use contracts::{ContractError, OutputMode, SigprofConfig};

pub const ENV_USR1: &str = "SIGPROF_USR1";
pub const ENV_USR2: &str = "SIGPROF_USR2";
pub const ENV_OUT: &str = "SIGPROF_OUT";
pub const ENV_DIR: &str = "SIGPROF_DIR";
pub const ENV_CPU_DURATION: &str = "SIGPROF_CPU_DURATION";
pub const ENV_CPU_FREQUENCY: &str = "SIGPROF_CPU_FREQUENCY";
/// Optional config file loaded before the overrides
pub const ENV_CONFIG: &str = "SIGPROF_CONFIG";

/// Apply `SIGPROF_*` variables on top of `config`
pub fn apply_overrides(
    config: &mut SigprofConfig,
    vars: &HashMap<String, String>,
) -> Result<(), ContractError> {
    if let Some(list) = non_empty(vars, ENV_USR1) {
        config.usr1 = split_profiles(list);
    }
    if let Some(list) = non_empty(vars, ENV_USR2) {
        config.usr2 = split_profiles(list);
    }
    if let Some(output) = non_empty(vars, ENV_OUT) {
        config.output = OutputMode::from(output.to_string());
    }
    if let Some(dir) = non_empty(vars, ENV_DIR) {
        config.output_dir = Some(PathBuf::from(dir));
    }
    if let Some(raw) = non_empty(vars, ENV_CPU_DURATION) {
        config.cpu.duration_secs = raw.trim().parse().map_err(|e| {
            ContractError::config_validation(ENV_CPU_DURATION, format!("'{raw}': {e}"))
        })?;
    }
    if let Some(raw) = non_empty(vars, ENV_CPU_FREQUENCY) {
        config.cpu.frequency_hz = raw.trim().parse().map_err(|e| {
            ContractError::config_validation(ENV_CPU_FREQUENCY, format!("'{raw}': {e}"))
        })?;
    }
    Ok(())
}

/// Split a comma-separated profile list, dropping blank entries
pub fn split_profiles(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_split_profiles() {
        assert_eq!(split_profiles("foo,bar"), vec!["foo", "bar"]);
        assert_eq!(split_profiles(" heap , cpu ,,heap"), vec!["heap", "cpu", "heap"]);
        assert!(split_profiles(" , ").is_empty());
    }

    #[test]
    fn test_no_vars_keeps_defaults() {
        let mut config = SigprofConfig::default();
        apply_overrides(&mut config, &HashMap::new()).unwrap();
        assert_eq!(config, SigprofConfig::default());
    }

    #[test]
    fn test_empty_vars_keep_defaults() {
        let mut config = SigprofConfig::default();
        apply_overrides(&mut config, &vars(&[(ENV_USR1, ""), (ENV_OUT, "")])).unwrap();
        assert_eq!(config, SigprofConfig::default());
    }

    #[test]
    fn test_overrides() {
        let mut config = SigprofConfig::default();
        apply_overrides(
            &mut config,
            &vars(&[
                (ENV_USR1, "threads,cpu"),
                (ENV_USR2, "tasks"),
                (ENV_OUT, "stderr"),
                (ENV_DIR, "/tmp/profiles"),
                (ENV_CPU_DURATION, "0.5"),
                (ENV_CPU_FREQUENCY, "997"),
            ]),
        )
        .unwrap();

        assert_eq!(config.usr1, vec!["threads", "cpu"]);
        assert_eq!(config.usr2, vec!["tasks"]);
        assert_eq!(config.output, OutputMode::Stderr);
        assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/profiles")));
        assert_eq!(config.cpu.duration_secs, 0.5);
        assert_eq!(config.cpu.frequency_hz, 997);
    }

    #[test]
    fn test_bad_number() {
        let mut config = SigprofConfig::default();
        let err = apply_overrides(&mut config, &vars(&[(ENV_CPU_FREQUENCY, "fast")])).unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
    }
}
