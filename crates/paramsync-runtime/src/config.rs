use crate::{Error, Result};
use paramsync_core::{DEFAULT_ROOT, PathBuilder};
use paramsync_store::aws::{AwsSettings, DEFAULT_SERVICE_INDEX};
use paramsync_store::param_store::DEFAULT_WRITE_CONCURRENCY;
use paramsync_store::shared_config::DEFAULT_BATCH_SIZE;
use paramsync_store::{RetryPolicy, SharedConfigSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an alternate config file
pub const CONFIG_ENV_VAR: &str = "PARAMSYNC_CONFIG";

/// Resolve the config file path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. PARAMSYNC_CONFIG environment variable (with tilde expansion)
/// 3. Platform config directory
/// 4. ~/.paramsync/config.toml
pub fn resolve_config_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR)
        && !env_path.is_empty()
    {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(config_dir) = dirs::config_dir() {
        return Ok(config_dir.join("paramsync").join("config.toml"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".paramsync").join("config.toml"));
    }

    Err(Error::Config(
        "Could not determine config path: no HOME directory or config directory found".to_string(),
    ))
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Prefix every parameter path starts with
    pub root_path: String,
    pub write_concurrency: usize,
    /// Listing cache lifetime; unset keeps listings for the whole run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_ttl_secs: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root_path: DEFAULT_ROOT.to_string(),
            write_concurrency: DEFAULT_WRITE_CONCURRENCY,
            cache_ttl_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedConfigSection {
    pub bootstrap_service: String,
    pub bootstrap_parameter: String,
    /// Secondary index keyed on the service attribute
    pub service_index: String,
    pub batch_size: usize,
    pub initial_backoff_ms: u64,
    pub max_retries: u32,
}

impl Default for SharedConfigSection {
    fn default() -> Self {
        let settings = SharedConfigSettings::default();
        Self {
            bootstrap_service: settings.bootstrap_service,
            bootstrap_parameter: settings.bootstrap_parameter,
            service_index: DEFAULT_SERVICE_INDEX.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            initial_backoff_ms: settings.retry.initial_delay.as_millis() as u64,
            max_retries: settings.retry.max_retries,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub shared_config: SharedConfigSection,
}

impl Config {
    /// Load from the resolved path; a missing file yields the defaults
    pub fn load(explicit_path: Option<&str>) -> Result<Self> {
        let config_path = resolve_config_path(explicit_path)?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.store.write_concurrency == 0 {
            return Err(Error::Config(
                "store.write_concurrency must be at least 1".to_string(),
            ));
        }
        if self.shared_config.batch_size == 0 {
            return Err(Error::Config(
                "shared_config.batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn paths(&self) -> PathBuilder {
        PathBuilder::new(&self.store.root_path)
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.store.cache_ttl_secs.map(Duration::from_secs)
    }

    pub fn aws_settings(&self) -> AwsSettings {
        AwsSettings {
            region: self.aws.region.clone(),
            profile: self.aws.profile.clone(),
            endpoint_url: self.aws.endpoint_url.clone(),
        }
    }

    pub fn shared_config_settings(&self) -> SharedConfigSettings {
        let section = &self.shared_config;
        SharedConfigSettings {
            bootstrap_service: section.bootstrap_service.clone(),
            bootstrap_parameter: section.bootstrap_parameter.clone(),
            batch_size: section.batch_size,
            retry: RetryPolicy::new(
                section.max_retries,
                Duration::from_millis(section.initial_backoff_ms),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.store.root_path, "/torc");
        assert_eq!(config.store.write_concurrency, 4);
        assert_eq!(config.shared_config.batch_size, 25);
        assert_eq!(config.shared_config.max_retries, 6);
        assert_eq!(config.shared_config.initial_backoff_ms, 100);
        assert_eq!(config.shared_config.service_index, "service-index");
        assert_eq!(config.cache_ttl(), None);
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.aws.region = Some("eu-west-1".to_string());
        config.aws.endpoint_url = Some("http://localhost:4566".to_string());
        config.store.cache_ttl_secs = Some(30);
        config.shared_config.bootstrap_service = "platform".to_string();

        config.save_to(&config_path)?;
        assert!(config_path.exists());

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);
        assert_eq!(loaded.cache_ttl(), Some(Duration::from_secs(30)));

        Ok(())
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "[store]\nroot_path = \"/acme/config\"\n\n[shared_config]\nmax_retries = 2\n",
        )?;

        let config = Config::load_from(&config_path)?;
        assert_eq!(config.store.root_path, "/acme/config");
        assert_eq!(config.store.write_concurrency, 4);
        assert_eq!(config.shared_config.batch_size, 25);
        assert_eq!(config.aws, AwsConfig::default());

        let settings = config.shared_config_settings();
        assert_eq!(settings.retry.max_retries, 2);
        assert_eq!(settings.retry.initial_delay, Duration::from_millis(100));
        assert_eq!(config.paths().root(), "/acme/config");

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path)?;
        assert_eq!(config, Config::default());

        Ok(())
    }

    #[test]
    fn test_invalid_values_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[store]\nwrite_concurrency = 0\n")?;

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(err.to_string().contains("write_concurrency"));

        std::fs::write(&config_path, "[store\n")?;
        assert!(matches!(
            Config::load_from(&config_path),
            Err(Error::Config(_))
        ));

        Ok(())
    }

    #[test]
    fn test_explicit_path_wins() -> Result<()> {
        let path = resolve_config_path(Some("/etc/paramsync/custom.toml"))?;
        assert_eq!(path, PathBuf::from("/etc/paramsync/custom.toml"));
        Ok(())
    }
}
