use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::core::RadiusBounds;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub api: ApiSettings,
    #[serde(default)]
    pub filter: FilterSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct FilterSettings {
    #[serde(default = "default_min_radius")]
    pub min_radius_km: f64,
    #[serde(default = "default_max_radius")]
    pub max_radius_km: f64,
    #[serde(default = "default_radius")]
    pub default_radius_km: f64,
    #[serde(default = "default_radius_step")]
    pub radius_step_km: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            min_radius_km: default_min_radius(),
            max_radius_km: default_max_radius(),
            default_radius_km: default_radius(),
            radius_step_km: default_radius_step(),
        }
    }
}

impl FilterSettings {
    pub fn bounds(&self) -> RadiusBounds {
        RadiusBounds::new(
            self.min_radius_km,
            self.max_radius_km,
            self.default_radius_km,
            self.radius_step_km,
        )
    }
}

fn default_min_radius() -> f64 { 1.0 }
fn default_max_radius() -> f64 { 10.0 }
fn default_radius() -> f64 { 3.0 }
fn default_radius_step() -> f64 { 0.5 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_ttl() -> u64 { 300 }
fn default_cache_capacity() -> u64 { 16 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionSettings {
    /// JSON file holding the persisted pin and radius; unset keeps them in memory
    pub store_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with TAYIB_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., TAYIB__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("TAYIB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("TAYIB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the shorthand `TAYIB_API_URL` variable, shared with the web frontend
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(api_url) = std::env::var("TAYIB_API_URL") {
        builder = builder.set_override("api.base_url", api_url)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_settings() {
        let filter = FilterSettings::default();
        assert_eq!(filter.min_radius_km, 1.0);
        assert_eq!(filter.max_radius_km, 10.0);
        assert_eq!(filter.default_radius_km, 3.0);
        assert_eq!(filter.radius_step_km, 0.5);
        assert_eq!(filter.bounds(), RadiusBounds::default());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("tayib-geo-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 8081

[api]
base_url = "http://localhost:8000"

[filter]
max_radius_km = 20.0
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.server.port, 8081);
        assert_eq!(settings.api.timeout_secs, 30);
        assert_eq!(settings.filter.max_radius_km, 20.0);
        assert_eq!(settings.filter.min_radius_km, 1.0);
        assert_eq!(settings.cache.ttl_secs, 300);
        assert!(settings.session.store_path.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
