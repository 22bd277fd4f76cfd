use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub favorites: FavoritesSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    /// Base URL of the catalog service, without a trailing path.
    pub base_url: String,
    /// Session cookie sent with every catalog request. Empty means
    /// unauthenticated.
    #[serde(default)]
    pub session_cookie: String,
    /// Per-request timeout. Unset leaves requests unbounded.
    pub timeout_secs: Option<u64>,
}

impl CatalogSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FavoritesSettings {
    /// Directory the favorites document is stored in.
    pub storage_dir: Option<PathBuf>,
}

impl FavoritesSettings {
    /// The configured directory, falling back to `~/.pawmatch`.
    pub fn resolved_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage_dir {
            return dir.clone();
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pawmatch")
    }
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
fn default_log_format() -> String { "pretty".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with PAWMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables
            // e.g., PAWMATCH__CATALOG__BASE_URL -> catalog.base_url
            .add_source(
                Environment::with_prefix("PAWMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PAWMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Honor the short unprefixed variables as well
///
/// `CATALOG_BASE_URL` and `CATALOG_SESSION_COOKIE` override their prefixed
/// equivalents, which keeps pasting a fresh session cookie into a shell
/// one variable long.
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(base_url) = env::var("CATALOG_BASE_URL") {
        builder = builder.set_override("catalog.base_url", base_url)?;
    }
    if let Ok(cookie) = env::var("CATALOG_SESSION_COOKIE") {
        builder = builder.set_override("catalog.session_cookie", cookie)?;
    }

    builder.build()
}
