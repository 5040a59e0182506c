//! Pre-flight checks
//!
//! Privilege first, then configuration, then discovery and the compatibility check.
//! Any failure here ends the program with exit code 1.

use conserve_config::{ConfigError, ConserveConfig};
use conserve_hal::{ControlError, ControlFile, Privileges, privilege};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("not running as root (effective uid {euid})")]
    Privilege { euid: u32 },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("no control file matches {pattern}")]
    Unsupported {
        pattern: String,
        kernel_module: String,
    },

    #[error("control file is not writable: {}", .0.display())]
    NotWritable(PathBuf),

    #[error("control file discovery failed: {0}")]
    Discovery(ControlError),
}

impl StartupError {
    /// Print the operator-facing diagnostic
    pub fn report<W: Write>(&self, err: &mut W) -> io::Result<()> {
        match self {
            StartupError::Privilege { .. } => {
                writeln!(err, "[ERROR] This program modifies system files.")?;
                writeln!(
                    err,
                    "        Please run it with root privileges, e.g., 'sudo conserve'"
                )?;
            }
            StartupError::Config(e) => {
                writeln!(err, "[ERROR] Could not load configuration.")?;
                writeln!(err, "        {}", e)?;
            }
            StartupError::Unsupported {
                pattern,
                kernel_module,
            } => {
                writeln!(
                    err,
                    "[ERROR] Conservation mode is not supported on this system."
                )?;
                writeln!(err, "        Could not find a file matching: {}", pattern)?;
                writeln!(
                    err,
                    "        Is the '{}' kernel module loaded?",
                    kernel_module
                )?;
            }
            StartupError::NotWritable(path) => {
                writeln!(err, "[ERROR] Cannot write to conservation mode file.")?;
                writeln!(err, "        Path: {}", path.display())?;
                writeln!(err, "        (This should not happen when running as root)")?;
            }
            StartupError::Discovery(e) => {
                writeln!(err, "!!! Error while searching for control file: {}", e)?;
            }
        }
        Ok(())
    }
}

/// Run the pre-flight sequence.
///
/// `load_config` is only called once the privilege check has passed, so nothing on
/// disk is touched by an unprivileged run.
pub fn start<P, F>(
    privileges: &P,
    load_config: F,
) -> Result<(ConserveConfig, ControlFile), StartupError>
where
    P: Privileges + ?Sized,
    F: FnOnce() -> Result<ConserveConfig, ConfigError>,
{
    privilege::require_superuser(privileges).map_err(|e| match e {
        ControlError::InsufficientPrivilege { euid } => StartupError::Privilege { euid },
        other => StartupError::Discovery(other),
    })?;

    let config = load_config()?;

    let control =
        ControlFile::discover(&config.control.pattern).map_err(StartupError::Discovery)?;

    match control.check_compatibility() {
        Ok(path) => tracing::debug!("Control file {} is usable", path.display()),
        Err(ControlError::NotFound { pattern }) => {
            return Err(StartupError::Unsupported {
                pattern,
                kernel_module: config.control.kernel_module.clone(),
            });
        }
        Err(ControlError::NotWritable(path)) => return Err(StartupError::NotWritable(path)),
        Err(other) => return Err(StartupError::Discovery(other)),
    }

    Ok((config, control))
}
