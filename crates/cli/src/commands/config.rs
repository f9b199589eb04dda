//! `config` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use config_loader::ConfigLoader;
use contracts::{ContractError, SigprofConfig};

use crate::cli::ConfigArgs;
use crate::error::CliError;

/// Resolution result for JSON output
#[derive(Serialize)]
struct ConfigReport {
    valid: bool,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<SigprofConfig>,
}

/// Execute the `config` command
pub fn run_config(args: &ConfigArgs) -> Result<()> {
    let source = match &args.config {
        Some(path) => path.display().to_string(),
        None => "environment".to_string(),
    };
    info!(source = %source, "Resolving configuration");

    let report = match resolve(args) {
        Ok(config) => ConfigReport {
            valid: true,
            source,
            error: None,
            config: Some(config),
        },
        Err(e) => ConfigReport {
            valid: false,
            source,
            error: Some(e.to_string()),
            config: None,
        },
    };

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize configuration")?;
        println!("{json}");
    } else {
        print_report(&report)?;
    }

    match report.error {
        None => Ok(()),
        Some(message) => Err(CliError::config_invalid(message).into()),
    }
}

fn resolve(args: &ConfigArgs) -> Result<SigprofConfig, ContractError> {
    let config = match &args.config {
        Some(path) => ConfigLoader::load_with_env(path)?,
        None => ConfigLoader::from_env()?,
    };
    ConfigLoader::validate(&config)?;
    Ok(config)
}

fn print_report(report: &ConfigReport) -> Result<()> {
    match &report.config {
        Some(config) => {
            println!("# resolved from {}", report.source);
            print!("{}", ConfigLoader::to_toml(config)?);
        }
        None => {
            println!("✗ Configuration is invalid: {}", report.source);
            if let Some(error) = &report.error {
                println!("\n  Error: {error}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_invalid_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sigprof.toml");
        fs::write(&path, "usr1 = []\n").unwrap();

        let args = ConfigArgs {
            config: Some(path),
            json: true,
        };
        let err = run_config(&args).unwrap_err();
        assert!(err.to_string().contains("usr1"));
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = ConfigArgs {
            config: Some(dir.path().join("absent.toml")),
            json: false,
        };
        assert!(run_config(&args).is_err());
    }
}
