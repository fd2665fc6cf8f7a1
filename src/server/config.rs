//! Configuration loading for photoreeld.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.photoreel/config.toml` (user)
//! 3. `/etc/photoreel/config.toml` (system)
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.photoreel/secrets.toml` (user, must be 0600)
//! 2. `/etc/photoreel/secrets.toml` (system, must be 0600)

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::catalog::DEFAULT_FLICKR_BASE_URL;
use crate::gateway::{DEFAULT_MANIFEST_PATH, DEFAULT_REFRESH_PATH, PhotoreelBuilder};
use crate::types::MissingSlotPolicy;
use crate::{Photoreel, PhotoreelError, Result};

/// Environment variable consulted when no secrets file provides a Flickr key.
pub const FLICKR_API_KEY_ENV: &str = "FLICKR_API_KEY";

/// Daemon configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheSection,
    pub gateway: GatewaySection,
    pub catalog: CatalogSection,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8787).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:8787".to_string()
}

/// Response cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Cache namespace (default: `flickr-images-cache-v1`).
    #[serde(default = "default_cache_name")]
    pub name: String,
    /// Freshness window in seconds (default: 86400).
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            name: default_cache_name(),
            ttl_secs: default_ttl(),
        }
    }
}

fn default_cache_name() -> String {
    crate::cache::response::DEFAULT_CACHE_NAME.to_string()
}

fn default_ttl() -> u64 {
    crate::cache::response::DEFAULT_TTL.as_secs()
}

/// Routing and fallback settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySection {
    /// Number of rotation slots (default: 6).
    #[serde(default = "default_image_count")]
    pub image_count: u32,
    /// Redirect target for unmatched paths.
    pub fallback_domain: String,
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    #[serde(default)]
    pub missing_slot_policy: MissingSlotPolicy,
}

fn default_image_count() -> u32 {
    crate::gateway::DEFAULT_IMAGE_COUNT.get()
}

fn default_manifest_path() -> String {
    DEFAULT_MANIFEST_PATH.to_string()
}

fn default_refresh_path() -> String {
    DEFAULT_REFRESH_PATH.to_string()
}

/// Flickr catalog settings. The API key lives in the secrets file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSection {
    pub photoset_id: String,
    /// Flickr API host (default: https://api.flickr.com).
    #[serde(default = "default_catalog_url")]
    pub base_url: String,
    /// Timeout for catalog and image fetches in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_catalog_url() -> String {
    DEFAULT_FLICKR_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub flickr: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.photoreel/config.toml`
    /// 3. `/etc/photoreel/config.toml`
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit_path)?;
        let content = fs::read_to_string(&path).map_err(|e| {
            PhotoreelError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            PhotoreelError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(PhotoreelError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".photoreel").join("config.toml");
            if user_config.exists() {
                return Ok(user_config);
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/photoreel/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }

        Err(PhotoreelError::Configuration(
            "No config file found. Create ~/.photoreel/config.toml or /etc/photoreel/config.toml"
                .to_string(),
        ))
    }

    /// Checks that do not need the gateway to be built.
    ///
    /// Route and fallback checks run again in [`PhotoreelBuilder::build`].
    pub fn validate(&self) -> Result<()> {
        if self.gateway.image_count == 0 {
            return Err(PhotoreelError::Configuration(
                "gateway.image_count must be at least 1".into(),
            ));
        }
        if self.catalog.photoset_id.trim().is_empty() {
            return Err(PhotoreelError::Configuration(
                "catalog.photoset_id must not be empty".into(),
            ));
        }
        if self.cache.ttl_secs == 0 {
            return Err(PhotoreelError::Configuration(
                "cache.ttl_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Turn this configuration into a gateway builder with a Flickr catalog.
    pub fn builder(&self, api_key: impl Into<String>) -> PhotoreelBuilder {
        Photoreel::builder()
            .flickr(api_key, &self.catalog.photoset_id)
            .flickr_base_url(&self.catalog.base_url)
            .timeout(self.catalog.timeout_secs)
            .image_count(self.gateway.image_count)
            .fallback_domain(&self.gateway.fallback_domain)
            .manifest_path(&self.gateway.manifest_path)
            .refresh_path(&self.gateway.refresh_path)
            .missing_slot_policy(self.gateway.missing_slot_policy)
            .cache(
                CacheConfig::new()
                    .name(&self.cache.name)
                    .ttl(Duration::from_secs(self.cache.ttl_secs)),
            )
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Resolution order:
    /// 1. `~/.photoreel/secrets.toml` (if exists, must be 0600)
    /// 2. `/etc/photoreel/secrets.toml` (if exists, must be 0600)
    ///
    /// Returns empty secrets if no file exists (the key may come from the environment).
    pub fn load() -> Result<Self> {
        // Try user secrets first
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".photoreel").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from(&user_secrets);
            }
        }

        // Try system secrets
        let system_secrets = PathBuf::from("/etc/photoreel/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load a specific secrets file, enforcing its permissions.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            PhotoreelError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            PhotoreelError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            PhotoreelError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(PhotoreelError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// Flickr API key, falling back to `FLICKR_API_KEY`.
    pub fn flickr_api_key(&self) -> Option<String> {
        self.flickr
            .as_ref()
            .map(|s| s.api_key.clone())
            .or_else(|| std::env::var(FLICKR_API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [gateway]
        fallback_domain = "https://example.com"

        [catalog]
        photoset_id = "72157600000000000"
    "#;

    #[test]
    fn parse_minimal_config() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.server.address, "127.0.0.1:8787");
        assert_eq!(config.cache.name, "flickr-images-cache-v1");
        assert_eq!(config.cache.ttl_secs, 86_400);
        assert_eq!(config.gateway.image_count, 6);
        assert_eq!(config.gateway.manifest_path, "/photos.json");
        assert_eq!(config.gateway.refresh_path, "/update-cache");
        assert_eq!(
            config.gateway.missing_slot_policy,
            MissingSlotPolicy::RedirectToFallback
        );
        assert_eq!(config.catalog.base_url, "https://api.flickr.com");
        assert_eq!(config.catalog.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [server]
            address = "0.0.0.0:8080"

            [cache]
            name = "rotation-v2"
            ttl_secs = 3600

            [gateway]
            image_count = 4
            fallback_domain = "https://photos.example.org"
            manifest_path = "/rotation.json"
            refresh_path = "/refresh"
            missing_slot_policy = "redirect-to-source"

            [catalog]
            photoset_id = "123"
            base_url = "http://localhost:9000"
            timeout_secs = 5
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.address, "0.0.0.0:8080");
        assert_eq!(config.cache.name, "rotation-v2");
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.gateway.image_count, 4);
        assert_eq!(config.gateway.manifest_path, "/rotation.json");
        assert_eq!(
            config.gateway.missing_slot_policy,
            MissingSlotPolicy::RedirectToSource
        );
        assert_eq!(config.catalog.base_url, "http://localhost:9000");
        assert_eq!(config.catalog.timeout_secs, 5);
    }

    #[test]
    fn missing_gateway_section_is_an_error() {
        let toml = r#"
            [catalog]
            photoset_id = "123"
        "#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn validate_rejects_zero_slots() {
        let mut config: Config = toml::from_str(MINIMAL).unwrap();
        config.gateway.image_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_photoset() {
        let mut config: Config = toml::from_str(MINIMAL).unwrap();
        config.catalog.photoset_id = " ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn builder_carries_settings() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        let gateway = config.builder("key").build().unwrap();
        assert_eq!(gateway.config().fallback_domain, "https://example.com");
        assert_eq!(gateway.cache().name(), "flickr-images-cache-v1");
        assert_eq!(gateway.cache().cache_control(), "max-age=86400");
    }

    #[test]
    fn parse_secrets() {
        let toml = r#"
            [flickr]
            api_key = "flickr-test-key"
        "#;
        let secrets: Secrets = toml::from_str(toml).unwrap();
        assert_eq!(secrets.flickr_api_key(), Some("flickr-test-key".to_string()));
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[cfg(unix)]
    #[test]
    fn secrets_with_open_permissions_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        fs::write(&path, "[flickr]\napi_key = \"k\"\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let err = Secrets::load_from(&path).unwrap_err().to_string();
        assert!(err.contains("insecure permissions"));

        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
        let secrets = Secrets::load_from(&path).unwrap();
        assert_eq!(secrets.flickr.unwrap().api_key, "k");
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, MINIMAL).unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.catalog.photoset_id, "72157600000000000");
    }
}
