use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

pub const CONFIG_FILE_NAME: &str = "reelsync.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub catalog: CatalogConfig,

    pub source: SourceConfig,

    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// `pretty` or `json`
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Local catalog module, relative to the working directory.
    pub path: String,

    pub array_name: String,

    pub type_name: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: "src/data/scenarios.ts".to_string(),
            array_name: "scenarios".to_string(),
            type_name: "Scenario".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Canonical remote copy of the catalog. Empty means local-only.
    pub url: String,

    pub request_timeout_seconds: u64,

    /// Every marker must appear in a fetched blob before it is trusted.
    pub required_markers: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            request_timeout_seconds: 30,
            required_markers: vec![
                "export const scenarios".to_string(),
                "id:".to_string(),
                "videoUrl:".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub enabled: bool,

    pub api_base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Pause between consecutive metadata queries.
    pub delay_ms: u64,

    pub request_timeout_seconds: u64,

    pub placeholder_ids: Vec<String>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            api_key: None,
            delay_ms: 250,
            request_timeout_seconds: 15,
            placeholder_ids: vec![
                "XXXXXXXXXXX".to_string(),
                "PLACEHOLDER".to_string(),
                "VIDEO_ID_HERE".to_string(),
            ],
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("reelsync").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".reelsync").join("config.toml"));
        }

        paths
    }

    #[must_use]
    pub fn default_config_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE_NAME)
    }

    pub fn create_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    /// Environment wins over the file for the source URL and the API key.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("REELSYNC_SOURCE_URL").ok(),
            std::env::var("YOUTUBE_API_KEY").ok(),
        );
    }

    fn apply_overrides(&mut self, source_url: Option<String>, api_key: Option<String>) {
        if let Some(url) = source_url.filter(|value| !value.trim().is_empty()) {
            self.source.url = url;
        }

        if let Some(key) = api_key.filter(|value| !value.trim().is_empty()) {
            self.enrichment.api_key = Some(key);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.catalog.path.trim().is_empty() {
            anyhow::bail!("Catalog path cannot be empty");
        }

        if self.catalog.array_name.trim().is_empty() || self.catalog.type_name.trim().is_empty()
        {
            anyhow::bail!("Catalog array and type names cannot be empty");
        }

        if !self.source.url.is_empty() {
            Url::parse(&self.source.url)
                .with_context(|| format!("Invalid source URL: {}", self.source.url))?;
        }

        if self.source.request_timeout_seconds == 0 || self.enrichment.request_timeout_seconds == 0
        {
            anyhow::bail!("Request timeouts must be > 0");
        }

        if self.enrichment.enabled {
            Url::parse(&self.enrichment.api_base_url).with_context(|| {
                format!("Invalid metadata API URL: {}", self.enrichment.api_base_url)
            })?;
        }

        Ok(())
    }

    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        PathBuf::from(&self.catalog.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog.path, "src/data/scenarios.ts");
        assert_eq!(config.catalog.array_name, "scenarios");
        assert_eq!(config.source.request_timeout_seconds, 30);
        assert_eq!(config.enrichment.delay_ms, 250);
        assert!(config.enrichment.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[catalog]"));
        assert!(toml_str.contains("[source]"));
        assert!(toml_str.contains("[enrichment]"));
        assert!(!toml_str.contains("api_key"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [enrichment]
            delay_ms = 1000
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.enrichment.delay_ms, 1000);

        assert_eq!(config.catalog.type_name, "Scenario");
        assert_eq!(config.source.required_markers.len(), 3);
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(Some("https://example.com/scenarios.ts".to_string()), None);
        assert_eq!(config.source.url, "https://example.com/scenarios.ts");
        assert!(config.enrichment.api_key.is_none());

        config.apply_overrides(Some("  ".to_string()), Some("secret".to_string()));
        assert_eq!(config.source.url, "https://example.com/scenarios.ts");
        assert_eq!(config.enrichment.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.source.url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.catalog.array_name = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("reelsync-config-{}.toml", uuid::Uuid::new_v4()));
        assert!(Config::create_default_if_missing(&path).unwrap());
        assert!(!Config::create_default_if_missing(&path).unwrap());

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.catalog.path, "src/data/scenarios.ts");
        std::fs::remove_file(&path).unwrap();
    }
}
