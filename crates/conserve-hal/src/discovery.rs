//! Control file discovery
//!
//! The driver binds to an ACPI device whose name varies between models (`VPC2004:00`
//! and similar), so the attribute is located with a wildcard under the driver directory.

use crate::ControlError;
use std::path::PathBuf;

/// Where the `ideapad_acpi` driver exposes conservation mode
pub const DEFAULT_PATTERN: &str = "/sys/bus/platform/drivers/ideapad_acpi/*/conservation_mode";

/// Kernel module that provides the control file
pub const KERNEL_MODULE: &str = "ideapad_acpi";

/// All existing paths matching `pattern`.
///
/// Entries come back in the order the `glob` crate yields them (sorted per directory
/// level). Callers should not depend on which of several matches comes first.
/// Directories that cannot be read while searching are logged and skipped.
pub fn find_control_files(pattern: &str) -> Result<Vec<PathBuf>, ControlError> {
    let entries = glob::glob(pattern).map_err(|source| ControlError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut found = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                tracing::debug!("Candidate control file {}", path.display());
                found.push(path);
            }
            Err(e) => {
                tracing::warn!("Skipping {} while searching: {}", e.path().display(), e.error());
            }
        }
    }

    if found.len() > 1 {
        tracing::warn!(
            "{} control files match {}, using {}",
            found.len(),
            pattern,
            found[0].display()
        );
    }

    Ok(found)
}

/// First path matching `pattern`, if any
pub fn first_match(pattern: &str) -> Result<Option<PathBuf>, ControlError> {
    Ok(find_control_files(pattern)?.into_iter().next())
}
