use super::rate::Precision;
use crate::client::DEFAULT_BASE_URL;
use crate::providers::http::DEFAULT_USER_AGENT;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub precision: Precision,
    pub suppress_errors: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            precision: Precision::Exact,
            suppress_errors: false,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or defaults if there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("pl", "nbpx", "nbpx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
base_url: "http://localhost:8080/api"
timeout_secs: 3
user_agent: "test-agent"
precision: approximate
suppress_errors: true
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.precision, Precision::Approximate);
        assert!(config.suppress_errors);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: AppConfig =
            serde_yaml::from_str("precision: exact\n").expect("Failed to deserialize");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.base_url, "https://api.nbp.pl/api");
        assert_eq!(config.timeout_secs, 10);
        assert!(!config.suppress_errors);
    }

    #[test]
    fn test_invalid_precision_is_rejected() {
        let result: Result<AppConfig, _> = serde_yaml::from_str("precision: fuzzy\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_path() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        fs::write(file.path(), "suppress_errors: true\n")?;

        let config = AppConfig::load_from_path(file.path())?;
        assert!(config.suppress_errors);
        assert_eq!(config.precision, Precision::Exact);

        let missing = AppConfig::load_from_path(file.path().with_extension("missing"));
        assert!(
            missing
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
        Ok(())
    }
}
