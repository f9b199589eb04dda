//! Config validation
//!
//! Rules:
//! - each trigger has at least one profile
//! - profile names are non-empty and contain no path separators
//! - cpu.duration_secs is >= 0 and representable as a Duration
//! - cpu.frequency_hz in 1..=10000

use std::time::Duration;

use contracts::{ContractError, SigprofConfig};

/// Highest accepted CPU sampling frequency
pub const MAX_CPU_FREQUENCY_HZ: i32 = 10_000;

/// Validate a SigprofConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &SigprofConfig) -> Result<(), ContractError> {
    validate_profiles("usr1", &config.usr1)?;
    validate_profiles("usr2", &config.usr2)?;
    validate_cpu(config)?;
    Ok(())
}

fn validate_profiles(field: &str, profiles: &[String]) -> Result<(), ContractError> {
    if profiles.is_empty() {
        return Err(ContractError::config_validation(
            field,
            "profile list cannot be empty",
        ));
    }
    for (idx, profile) in profiles.iter().enumerate() {
        if profile.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("{field}[{idx}]"),
                "profile name cannot be empty",
            ));
        }
        // the name is embedded in file sink names
        if profile.contains(std::path::is_separator) {
            return Err(ContractError::config_validation(
                format!("{field}[{idx}]"),
                format!("profile name '{profile}' cannot contain a path separator"),
            ));
        }
    }
    Ok(())
}

fn validate_cpu(config: &SigprofConfig) -> Result<(), ContractError> {
    let cpu = &config.cpu;
    if let Err(e) = Duration::try_from_secs_f64(cpu.duration_secs) {
        return Err(ContractError::config_validation(
            "cpu.duration_secs",
            format!("invalid duration {}: {e}", cpu.duration_secs),
        ));
    }
    if !(1..=MAX_CPU_FREQUENCY_HZ).contains(&cpu.frequency_hz) {
        return Err(ContractError::config_validation(
            "cpu.frequency_hz",
            format!(
                "frequency must be in 1..={MAX_CPU_FREQUENCY_HZ}, got {}",
                cpu.frequency_hz
            ),
        ));
    }
    Ok(())
}
