//! Operator-facing text settings

use crate::ConfigError;
use serde::Deserialize;

/// How the menu describes the machine and its charge limits
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DisplayConfig {
    /// Product name shown in the banner
    #[serde(default = "default_product_name")]
    pub product_name: String,

    /// Charge limit (percentage) while conservation mode is on
    #[serde(default = "default_conservation_limit")]
    pub conservation_limit: u8,

    /// Charge limit (percentage) while conservation mode is off
    #[serde(default = "default_full_limit")]
    pub full_limit: u8,
}

fn default_product_name() -> String {
    "Lenovo Legion".to_string()
}

fn default_conservation_limit() -> u8 {
    60
}

fn default_full_limit() -> u8 {
    100
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            product_name: default_product_name(),
            conservation_limit: default_conservation_limit(),
            full_limit: default_full_limit(),
        }
    }
}

impl DisplayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.conservation_limit == 0
            || self.conservation_limit >= self.full_limit
            || self.full_limit > 100
        {
            return Err(ConfigError::Invalid(format!(
                "charge limits must satisfy 0 < conservation_limit < full_limit <= 100 (got {} and {})",
                self.conservation_limit, self.full_limit
            )));
        }
        Ok(())
    }
}

/// Who to contact when something unexpected goes wrong
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SupportConfig {
    #[serde(default)]
    pub contact: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(conservation_limit: u8, full_limit: u8) -> DisplayConfig {
        DisplayConfig {
            conservation_limit,
            full_limit,
            ..DisplayConfig::default()
        }
    }

    #[test]
    fn test_default_limits() {
        let display = DisplayConfig::default();
        assert_eq!(display.product_name, "Lenovo Legion");
        assert!(display.validate().is_ok());
    }

    #[test]
    fn test_limit_bounds() {
        assert!(limits(80, 100).validate().is_ok());
        assert!(limits(55, 90).validate().is_ok());
        assert!(limits(0, 100).validate().is_err());
        assert!(limits(60, 60).validate().is_err());
        assert!(limits(90, 80).validate().is_err());
        assert!(limits(60, 101).validate().is_err());
    }
}
