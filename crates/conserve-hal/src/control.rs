//! Conservation mode control file
//!
//! Wraps the sysfs attribute exposed by the `ideapad_acpi` driver. The path is resolved
//! once at construction; the value is read from the file on every query.

use crate::discovery;
use nix::unistd::{AccessFlags, access};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("Insufficient privilege: effective uid {euid} is not root")]
    InsufficientPrivilege { euid: u32 },

    #[error("No control file found matching {pattern}")]
    NotFound { pattern: String },

    #[error("Control file is not writable: {}", .0.display())]
    NotWritable(PathBuf),

    #[error("Invalid search pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Conservation mode as last read from the control file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeStatus {
    Enabled,
    Disabled,
    /// The file could not be read
    Unknown,
}

impl ModeStatus {
    /// Interpret raw file contents.
    ///
    /// Only a literal `1` (surrounding whitespace ignored) means enabled. Anything else,
    /// including empty or malformed contents, reads as disabled.
    pub fn from_contents(contents: &str) -> Self {
        if contents.trim() == "1" {
            ModeStatus::Enabled
        } else {
            ModeStatus::Disabled
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self == ModeStatus::Enabled
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModeStatus::Enabled => "enabled",
            ModeStatus::Disabled => "disabled",
            ModeStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ModeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value written to the control file for a target state
pub fn control_value(enable: bool) -> &'static str {
    if enable { "1" } else { "0" }
}

/// The conservation mode control file
#[derive(Debug, Clone)]
pub struct ControlFile {
    pattern: String,
    path: Option<PathBuf>,
}

impl ControlFile {
    /// Search `pattern` and bind to the first match.
    ///
    /// Finding nothing is not an error here; it shows up in [`check_compatibility`].
    /// Only a malformed pattern fails.
    ///
    /// [`check_compatibility`]: ControlFile::check_compatibility
    pub fn discover(pattern: &str) -> Result<Self, ControlError> {
        let path = discovery::first_match(pattern)?;
        match &path {
            Some(path) => tracing::info!("Found conservation mode control at {}", path.display()),
            None => tracing::debug!("Nothing matches {}", pattern),
        }

        Ok(Self {
            pattern: pattern.to_string(),
            path,
        })
    }

    /// Bind to a known path without searching
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            pattern: path.display().to_string(),
            path: Some(path),
        }
    }

    /// Pattern this control was discovered with
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Resolved path, if discovery found one
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether the path currently refers to an existing file
    pub fn exists(&self) -> bool {
        self.path.as_deref().is_some_and(Path::is_file)
    }

    /// Whether the current process may write the file
    pub fn writable(&self) -> bool {
        self.path
            .as_deref()
            .is_some_and(|path| access(path, AccessFlags::W_OK).is_ok())
    }

    /// Verify the control file exists and is writable.
    ///
    /// Returns the validated path. The error distinguishes a missing file from a
    /// permission problem.
    pub fn check_compatibility(&self) -> Result<&Path, ControlError> {
        let path = match self.path.as_deref() {
            Some(path) if path.is_file() => path,
            _ => {
                return Err(ControlError::NotFound {
                    pattern: self.pattern.clone(),
                });
            }
        };

        if !self.writable() {
            return Err(ControlError::NotWritable(path.to_path_buf()));
        }

        Ok(path)
    }

    pub fn is_compatible(&self) -> bool {
        self.check_compatibility().is_ok()
    }

    /// Read the current mode from the file
    pub fn read_status(&self) -> Result<ModeStatus, ControlError> {
        let path = self.require_path()?;
        let bytes = fs::read(path).map_err(|source| ControlError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        // Malformed contents are not a read failure; they just aren't "1"
        let contents = String::from_utf8_lossy(&bytes);
        let status = ModeStatus::from_contents(&contents);
        tracing::debug!("Read {:?} from {} ({})", contents.trim(), path.display(), status);
        Ok(status)
    }

    /// Read the current mode, mapping any read failure to [`ModeStatus::Unknown`]
    pub fn status(&self) -> ModeStatus {
        self.read_status().unwrap_or_else(|e| {
            tracing::error!("{}", e);
            ModeStatus::Unknown
        })
    }

    /// Overwrite the file with the value for `enable`.
    ///
    /// Single attempt; the written value is not read back.
    pub fn write_status(&self, enable: bool) -> Result<(), ControlError> {
        let path = self.require_path()?;
        let value = control_value(enable);

        fs::write(path, value).map_err(|source| ControlError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Wrote {} to {}", value, path.display());
        Ok(())
    }

    fn require_path(&self) -> Result<&Path, ControlError> {
        self.path.as_deref().ok_or_else(|| ControlError::NotFound {
            pattern: self.pattern.clone(),
        })
    }
}
