//! Hardware access for battery conservation mode
//!
//! Lenovo IdeaPad and Legion laptops expose a `conservation_mode` attribute through the
//! `ideapad_acpi` platform driver. Writing `1` caps the battery charge (usually around 60%),
//! writing `0` lets it charge to 100%.
//!
//! This crate locates that attribute, checks that the current process may change it, and
//! reads or writes the mode. Every read goes back to sysfs; nothing is cached.
//!
//! # Example
//!
//! ```no_run
//! use conserve_hal::{ControlFile, SystemPrivileges, discovery, privilege};
//!
//! fn main() -> conserve_hal::Result<()> {
//!     privilege::require_superuser(&SystemPrivileges)?;
//!
//!     let control = ControlFile::discover(discovery::DEFAULT_PATTERN)?;
//!     control.check_compatibility()?;
//!
//!     control.write_status(true)?;
//!     println!("Conservation mode: {}", control.status());
//!     Ok(())
//! }
//! ```

pub mod control;
pub mod discovery;
pub mod mock;
pub mod privilege;

pub use control::{ControlError, ControlFile, ModeStatus};
pub use privilege::{Privileges, SystemPrivileges};

/// HAL Result type
pub type Result<T> = std::result::Result<T, ControlError>;
