//! Configuration management
//!
//! Loads resolver settings from an optional `config.toml` with environment
//! overrides (`USB_PATH__FALLBACK_PATH`, `USB_PATH__ENUMERATION_TIMEOUT_MS`, ...).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FALLBACK_PATH: &str = "/storage/emulated/0";
pub const DEFAULT_MOUNTINFO_PATH: &str = "/proc/self/mountinfo";
pub const DEFAULT_SYSFS_ROOT: &str = "/sys";
pub const DEFAULT_UUID_DIR: &str = "/dev/disk/by-uuid";
pub const DEFAULT_ENUMERATION_TIMEOUT_MS: u64 = 2000;

/// Resolver configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Default external-storage root returned when no removable volume qualifies
    pub fallback_path: String,

    // ═══ OS BINDING ═══
    pub mountinfo_path: String,
    pub sysfs_root: String,
    pub uuid_dir: String,

    /// Upper bound on a single enumeration
    pub enumeration_timeout_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fallback_path: DEFAULT_FALLBACK_PATH.to_string(),
            mountinfo_path: DEFAULT_MOUNTINFO_PATH.to_string(),
            sysfs_root: DEFAULT_SYSFS_ROOT.to_string(),
            uuid_dir: DEFAULT_UUID_DIR.to_string(),
            enumeration_timeout_ms: DEFAULT_ENUMERATION_TIMEOUT_MS,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        // Installed layout first, then the working directory
        let config_paths = ["usb-path/config", "config"];

        let mut builder = Self::defaults_builder()?;
        for config_path in config_paths {
            builder = builder.add_source(File::with_name(config_path).required(false));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("USB_PATH")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Self::from_settings(settings)
    }

    /// Load configuration from a single explicit file, without environment overrides
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let settings = Self::defaults_builder()?
            .add_source(File::with_name(path))
            .build()?;

        Self::from_settings(settings)
    }

    fn defaults_builder()
    -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .set_default("fallback_path", defaults.fallback_path)?
            .set_default("mountinfo_path", defaults.mountinfo_path)?
            .set_default("sysfs_root", defaults.sysfs_root)?
            .set_default("uuid_dir", defaults.uuid_dir)?
            .set_default(
                "enumeration_timeout_ms",
                defaults.enumeration_timeout_ms as i64,
            )
    }

    fn from_settings(settings: Config) -> Result<Self, ConfigError> {
        let config: ResolverConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback_path.trim().is_empty() {
            return Err(ConfigError::Message("fallback_path cannot be empty".into()));
        }

        if self.mountinfo_path.trim().is_empty() {
            return Err(ConfigError::Message(
                "mountinfo_path cannot be empty".into(),
            ));
        }

        if self.enumeration_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "enumeration_timeout_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get fallback path as PathBuf
    pub fn fallback_path_buf(&self) -> PathBuf {
        PathBuf::from(&self.fallback_path)
    }

    /// Get enumeration timeout as Duration
    pub fn enumeration_timeout(&self) -> Duration {
        Duration::from_millis(self.enumeration_timeout_ms)
    }
}
