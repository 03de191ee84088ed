//! Replay configuration
//!
//! Read from the environment (after `.env` is loaded); the first command
//! line argument overrides the leg log path.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use tracing::warn;

/// How the replay report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(OutputFormat::Pretty),
            "compact" => Ok(OutputFormat::Compact),
            other => Err(anyhow!("unknown REPLAY_OUTPUT {other:?}, expected pretty or compact")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayConfig {
    pub leg_log_path: PathBuf,
    pub output: OutputFormat,
}

impl ReplayConfig {
    /// Build from `LEG_LOG_PATH` and `REPLAY_OUTPUT`
    pub fn from_env() -> Result<Self> {
        Self::resolve(
            None,
            env::var("LEG_LOG_PATH").ok(),
            env::var("REPLAY_OUTPUT").ok(),
        )
    }

    /// As [`ReplayConfig::from_env`], with `path` taking precedence over `LEG_LOG_PATH`
    pub fn from_env_and_args(mut args: impl Iterator<Item = String>) -> Result<Self> {
        Self::resolve(
            args.next(),
            env::var("LEG_LOG_PATH").ok(),
            env::var("REPLAY_OUTPUT").ok(),
        )
    }

    fn resolve(
        arg_path: Option<String>,
        env_path: Option<String>,
        output: Option<String>,
    ) -> Result<Self> {
        let leg_log_path = arg_path
            .or(env_path)
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("no leg log given: pass a path or set LEG_LOG_PATH"))?;

        let output = match output {
            Some(raw) => raw.parse()?,
            None => {
                warn!("REPLAY_OUTPUT not set, using pretty output");
                OutputFormat::default()
            }
        };

        Ok(Self {
            leg_log_path,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_overrides_env_path() {
        let config = ReplayConfig::resolve(
            Some("cli.json".to_string()),
            Some("env.json".to_string()),
            Some("compact".to_string()),
        )
        .unwrap();
        assert_eq!(config.leg_log_path, PathBuf::from("cli.json"));
        assert_eq!(config.output, OutputFormat::Compact);
    }

    #[test]
    fn test_defaults_and_errors() {
        let config = ReplayConfig::resolve(None, Some("env.json".to_string()), None).unwrap();
        assert_eq!(config.output, OutputFormat::Pretty);

        assert!(ReplayConfig::resolve(None, None, None).is_err());
        assert!(ReplayConfig::resolve(None, Some("x".to_string()), Some("yaml".to_string()))
            .is_err());
    }
}
