//! Control file location

use crate::ConfigError;
use conserve_hal::discovery::{DEFAULT_PATTERN, KERNEL_MODULE};
use serde::Deserialize;
use std::path::Path;

/// Where to look for the conservation mode attribute
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ControlConfig {
    /// Glob pattern for the control file
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Kernel module named in diagnostics when nothing matches
    #[serde(default = "default_kernel_module")]
    pub kernel_module: String,
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

fn default_kernel_module() -> String {
    KERNEL_MODULE.to_string()
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            kernel_module: default_kernel_module(),
        }
    }
}

impl ControlConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pattern = self.pattern.trim();
        if pattern.is_empty() {
            return Err(ConfigError::Invalid("control.pattern is empty".into()));
        }

        if !pattern.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "control.pattern must be absolute: {}",
                pattern
            )));
        }

        // The attribute itself is matched by name, only parent directories may be wildcards
        let file_name = Path::new(pattern)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if pattern.ends_with('/') || file_name.is_empty() || file_name.contains(['*', '?', '[']) {
            return Err(ConfigError::Invalid(format!(
                "control.pattern must end in a literal file name: {}",
                pattern
            )));
        }

        if self.kernel_module.trim().is_empty() {
            return Err(ConfigError::Invalid("control.kernel_module is empty".into()));
        }

        Ok(())
    }
}
