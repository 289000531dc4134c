use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("pet-provider"))
}

// ============================================================================
// Provider Config
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Fixed generator seed; names are random when unset
    #[serde(default)]
    pub seed: Option<u64>,

    /// Worker threads for batch dispatch
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Pretty-print response JSON
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_jobs() -> usize {
    4
}

fn default_pretty() -> bool {
    true
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            seed: None,
            jobs: default_jobs(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

impl ProviderConfig {
    /// Default config file path
    pub fn default_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load `path`, or the default file when `None`
    ///
    /// A missing default file yields the defaults. An explicitly given
    /// file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::default_path()?, false),
        };

        if !explicit && !path.exists() {
            log::debug!("Config file does not exist, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            bail!("jobs must be at least 1");
        }
        Ok(())
    }

    /// Serialize a response according to the output settings
    pub fn to_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.output.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::parse("").unwrap();
        assert_eq!(config, ProviderConfig::default());
        assert_eq!(config.seed, None);
        assert_eq!(config.jobs, 4);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_parse_all_keys() {
        let config = ProviderConfig::parse(
            r"
seed = 42
jobs = 8

[output]
pretty = false
",
        )
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.jobs, 8);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_zero_jobs_rejected() {
        assert!(ProviderConfig::parse("jobs = 0").is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(ProviderConfig::parse("color = true").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "seed = 7\n").unwrap();

        let config = ProviderConfig::load(Some(&path)).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.jobs, 4);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = ProviderConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_to_json_compact() {
        let config = ProviderConfig::parse("[output]\npretty = false").unwrap();
        let json = config.to_json(&serde_json::json!({"a": [1, 2]})).unwrap();
        assert_eq!(json, r#"{"a":[1,2]}"#);
    }
}
