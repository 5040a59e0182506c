//! Configuration for the conservation mode toggle
//!
//! Everything has a working default; a TOML file only needs the keys it changes.
//! The file is read once at startup and never written back.

mod control_config;
mod display_config;

pub use control_config::ControlConfig;
pub use display_config::{DisplayConfig, SupportConfig};

use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Standard configuration directory
pub const CONFIG_DIR: &str = "/etc/conserve";

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV: &str = "CONSERVE_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConserveConfig {
    #[serde(default)]
    pub control: ControlConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub support: SupportConfig,
}

impl ConserveConfig {
    /// Load and validate configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from `$CONSERVE_CONFIG`, then the system location, then defaults
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_with_override(std::env::var_os(CONFIG_ENV))
    }

    /// Like [`load_default`](Self::load_default) with the override passed in.
    ///
    /// An explicit override must exist; the system file is optional.
    pub fn load_with_override(explicit: Option<OsString>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit.filter(|p| !p.is_empty()) {
            return Self::load(Path::new(&path));
        }

        let system_config = Self::system_path();
        if system_config.exists() {
            return Self::load(&system_config);
        }

        tracing::debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// `/etc/conserve/config.toml`
    pub fn system_path() -> PathBuf {
        Path::new(CONFIG_DIR).join("config.toml")
    }

    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.control.validate()?;
        self.display.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ConserveConfig::default();
        assert_eq!(
            config.control.pattern,
            conserve_hal::discovery::DEFAULT_PATTERN
        );
        assert_eq!(config.display.conservation_limit, 60);
        assert_eq!(config.display.full_limit, 100);
        assert!(config.support.contact.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let config_content = r#"
[display]
product_name = "Lenovo IdeaPad"
conservation_limit = 80

[support]
contact = "ops@example.com"
"#;
        write!(temp_file, "{}", config_content).unwrap();

        let config = ConserveConfig::load(temp_file.path()).unwrap();
        assert_eq!(config.display.product_name, "Lenovo IdeaPad");
        assert_eq!(config.display.conservation_limit, 80);
        assert_eq!(config.display.full_limit, 100);
        assert_eq!(config.support.contact.as_deref(), Some("ops@example.com"));
        assert_eq!(config.control, ControlConfig::default());
    }

    #[test]
    fn test_load_empty_file_gives_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = ConserveConfig::load(temp_file.path()).unwrap();
        assert_eq!(config, ConserveConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConserveConfig::load(Path::new("/nonexistent/conserve.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[display\nconservation_limit = ").unwrap();

        let err = ConserveConfig::load(temp_file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[display]\nconservation_limit = 100\n").unwrap();

        let err = ConserveConfig::load(temp_file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_explicit_override_must_exist() {
        let err = ConserveConfig::load_with_override(Some("/nonexistent/conserve.toml".into()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_explicit_override_is_used() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[control]\nkernel_module = \"legion_acpi\"\n").unwrap();

        let config =
            ConserveConfig::load_with_override(Some(temp_file.path().as_os_str().to_owned()))
                .unwrap();
        assert_eq!(config.control.kernel_module, "legion_acpi");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid("test error".to_string());
        assert!(format!("{}", err).contains("Invalid"));
    }

    #[test]
    fn test_constants() {
        assert_eq!(CONFIG_DIR, "/etc/conserve");
        assert_eq!(
            ConserveConfig::system_path(),
            PathBuf::from("/etc/conserve/config.toml")
        );
    }
}
