//! # Configuration
//!
//! YAML configuration for the simulator: engine limits, which stages get
//! inline spectra, and logging.
//!
//! ## Search Path
//!
//! The first file found wins:
//! 1. Path in the `DSSS_CONFIG` environment variable
//! 2. `./dsss.yaml`
//! 3. `<user config dir>/dsss/config.yaml`
//! 4. `/etc/dsss/config.yaml`
//!
//! Without a file the defaults apply.
//!
//! ## Example
//!
//! ```yaml
//! engine:
//!   store_capacity: 32
//!   store_ttl_secs: 600
//!   inline_stages: [modulator, channel]
//!   max_points: 2048
//!
//! logging:
//!   level: debug
//!   format: pretty
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::observe::LogConfig;
use crate::stage::StageName;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "DSSS_CONFIG";

/// Error type for configuration operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found: {0}")]
    NotFound(String),
    #[error("failed to read config: {0}")]
    ReadError(String),
    #[error("failed to write config: {0}")]
    WriteError(String),
    #[error("failed to parse config: {0}")]
    ParseError(String),
    #[error("invalid config: {0}")]
    ValidationError(String),
}

/// Simulation engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Runs kept in the store before the oldest is evicted
    pub store_capacity: usize,
    /// Age after which a run is no longer served (None keeps runs until evicted)
    pub store_ttl_secs: Option<u64>,
    /// Stages whose spectra are returned with every simulation response
    pub inline_stages: Vec<StageName>,
    /// Upper bound on points per returned series (0 returns everything)
    pub max_points: usize,
    /// Minimum secret length in characters
    pub min_secret_len: usize,
    /// Fixed channel noise seed for reproducible runs
    pub noise_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store_capacity: 16,
            store_ttl_secs: None,
            inline_stages: vec![StageName::Modulator, StageName::Channel],
            max_points: 2048,
            min_secret_len: 4,
            noise_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn store_ttl(&self) -> Option<Duration> {
        self.store_ttl_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "store_capacity must be > 0".to_string(),
            ));
        }
        if self.store_ttl_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "store_ttl_secs must be > 0 when set".to_string(),
            ));
        }
        let mut seen = Vec::with_capacity(self.inline_stages.len());
        for stage in &self.inline_stages {
            if seen.contains(stage) {
                return Err(ConfigError::ValidationError(format!(
                    "inline stage '{stage}' listed twice"
                )));
            }
            seen.push(*stage);
        }
        Ok(())
    }
}

/// Complete simulator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DsssConfig {
    pub version: String,
    pub engine: EngineConfig,
    pub logging: LogConfig,
}

impl Default for DsssConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            engine: EngineConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl DsssConfig {
    /// Load from the first file on the search path, or defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// First existing config file, honouring `DSSS_CONFIG`.
    ///
    /// `DSSS_CONFIG` pointing to a missing file is ignored.
    pub fn find_config_file() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            tracing::warn!(path = %path.display(), "{} points to a missing file", CONFIG_ENV_VAR);
        }
        Self::config_search_paths().into_iter().find(|p| p.exists())
    }

    /// Load, then validate, a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        let config = Self::parse(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from a YAML string. Missing keys take defaults.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::WriteError(format!("{}: {}", path.display(), e)))
    }

    /// Standard locations, most specific first (the env var is not included).
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./dsss.yaml")];

        if let Some(dirs) = directories::ProjectDirs::from("", "", "dsss") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/dsss/config.yaml"));
        paths
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()
    }

    /// Config file with every key spelled out.
    pub fn example_yaml() -> String {
        let config = Self {
            engine: EngineConfig {
                store_ttl_secs: Some(3600),
                ..Default::default()
            },
            ..Default::default()
        };
        serde_yaml::to_string(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::{LogFormat, LogLevel};

    #[test]
    fn test_default_config() {
        let config = DsssConfig::default();
        assert_eq!(config.engine.store_capacity, 16);
        assert_eq!(
            config.engine.inline_stages,
            vec![StageName::Modulator, StageName::Channel]
        );
        assert_eq!(config.engine.max_points, 2048);
        assert_eq!(config.engine.min_secret_len, 4);
        assert!(config.engine.store_ttl().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
engine:
  store_capacity: 4
  store_ttl_secs: 30
  inline_stages: [source, spreader]
  noise_seed: 7

logging:
  level: debug
  format: json
"#;
        let config = DsssConfig::parse(yaml).unwrap();
        assert_eq!(config.engine.store_capacity, 4);
        assert_eq!(config.engine.store_ttl(), Some(Duration::from_secs(30)));
        assert_eq!(
            config.engine.inline_stages,
            vec![StageName::Source, StageName::Spreader]
        );
        assert_eq!(config.engine.noise_seed, Some(7));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
        // Unspecified keys keep their defaults
        assert_eq!(config.engine.max_points, 2048);
    }

    #[test]
    fn test_unknown_stage_is_parse_error() {
        let err = DsssConfig::parse("engine:\n  inline_stages: [mixer]\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = DsssConfig::default();
        config.engine.store_capacity = 0;
        assert!(config.validate().is_err());

        config.engine.store_capacity = 8;
        config.engine.store_ttl_secs = Some(0);
        assert!(config.validate().is_err());

        config.engine.store_ttl_secs = None;
        config.engine.inline_stages = vec![StageName::Channel, StageName::Channel];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_example_yaml_parses() {
        let yaml = DsssConfig::example_yaml();
        assert!(yaml.contains("engine:"));
        assert!(yaml.contains("logging:"));
        let parsed = DsssConfig::parse(&yaml).unwrap();
        assert_eq!(parsed.engine.store_ttl_secs, Some(3600));
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("dsss-config-{}.yaml", std::process::id()));
        let mut config = DsssConfig::default();
        config.engine.store_capacity = 3;
        config.save(&path).unwrap();

        let loaded = DsssConfig::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let err = DsssConfig::load_from(Path::new("/nonexistent/dsss.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_config_search_paths() {
        let paths = DsssConfig::config_search_paths();
        assert!(paths[0].ends_with("dsss.yaml"));
        assert!(paths.last().unwrap().ends_with("config.yaml"));
    }
}
