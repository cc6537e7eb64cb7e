//! Tool configuration

use std::path::Path;

use anyhow::Context;
use dsreadout_core::transducer::EngineConfig;
use serde::{Deserialize, Serialize};

/// Settings read from `--config`.
///
/// Engine keys sit at the top level next to the settle times, e.g.
/// `{ "poll_interval_ms": 500, "reset_settle_secs": 10 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    #[serde(flatten)]
    pub engine: EngineConfig,
    /// Wait after a factory reset before assigning an address
    pub reset_settle_secs: u64,
    /// Wait after assigning an address
    pub address_settle_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            reset_settle_secs: 10,
            address_settle_secs: 5,
        }
    }
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read config `{}'", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config `{}'", path.display()))?;
        config.engine.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_no_file_gives_defaults() {
        assert_eq!(CliConfig::load(None).unwrap(), CliConfig::default());
    }

    #[test]
    fn test_flattened_engine_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "poll_interval_ms": 250, "verbose": true, "reset_settle_secs": 3 }}"#
        )
        .unwrap();

        let config = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.engine.poll_interval_ms, 250);
        assert!(config.engine.verbose);
        assert_eq!(config.reset_settle_secs, 3);
        assert_eq!(config.address_settle_secs, 5);
    }

    #[test]
    fn test_invalid_engine_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "poll_interval_ms": 0 }}"#).unwrap();
        assert!(CliConfig::load(Some(file.path())).is_err());
    }
}
