//! Mock implementations for testing without IdeaPad hardware
//!
//! [`MockSysfs`] lays out the `ideapad_acpi` driver tree under an arbitrary root so
//! discovery can run against the real pattern. [`MockPrivileges`] stands in for the
//! process's effective uid.
//!
//! # Usage
//!
//! ```no_run
//! use conserve_hal::ControlFile;
//! use conserve_hal::mock::MockSysfs;
//!
//! let sysfs = MockSysfs::new("/tmp/fake-root");
//! sysfs.add_device("VPC2004:00", "0").unwrap();
//!
//! let control = ControlFile::discover(&sysfs.pattern()).unwrap();
//! assert!(control.is_compatible());
//! ```

use crate::Privileges;
use crate::discovery::DEFAULT_PATTERN;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Fixed effective uid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPrivileges {
    euid: u32,
}

impl MockPrivileges {
    pub fn root() -> Self {
        Self { euid: 0 }
    }

    pub fn user(euid: u32) -> Self {
        Self { euid }
    }
}

impl Privileges for MockPrivileges {
    fn effective_uid(&self) -> u32 {
        self.euid
    }
}

/// Fake sysfs tree rooted at a scratch directory
#[derive(Debug, Clone)]
pub struct MockSysfs {
    root: PathBuf,
}

impl MockSysfs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `ideapad_acpi` driver directory inside the fake tree
    pub fn driver_dir(&self) -> PathBuf {
        let driver = Path::new(DEFAULT_PATTERN)
            .parent()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new("/"));
        self.root.join(driver.strip_prefix("/").unwrap_or(driver))
    }

    /// The default discovery pattern relocated under the fake root
    pub fn pattern(&self) -> String {
        format!(
            "{}/{}",
            glob::Pattern::escape(&self.root.to_string_lossy()),
            DEFAULT_PATTERN.trim_start_matches('/')
        )
    }

    /// Create a bound device with a `conservation_mode` attribute holding `contents`
    pub fn add_device(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        let device = self.driver_dir().join(name);
        fs::create_dir_all(&device)?;

        let path = device.join("conservation_mode");
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Create the driver directory with no devices bound
    pub fn add_driver(&self) -> io::Result<()> {
        fs::create_dir_all(self.driver_dir())
    }

    /// Raw contents of an attribute created by [`add_device`](MockSysfs::add_device)
    pub fn read_value(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mock_privileges() {
        assert!(MockPrivileges::root().is_superuser());
        assert!(!MockPrivileges::user(1000).is_superuser());
        assert_eq!(MockPrivileges::user(42).effective_uid(), 42);
    }

    #[test]
    fn test_driver_dir_layout() {
        let sysfs = MockSysfs::new("/tmp/root");
        assert_eq!(
            sysfs.driver_dir(),
            PathBuf::from("/tmp/root/sys/bus/platform/drivers/ideapad_acpi")
        );
        assert_eq!(
            sysfs.pattern(),
            "/tmp/root/sys/bus/platform/drivers/ideapad_acpi/*/conservation_mode"
        );
    }

    #[test]
    fn test_add_device() {
        let dir = TempDir::new().unwrap();
        let sysfs = MockSysfs::new(dir.path());

        let path = sysfs.add_device("VPC2004:00", "1").unwrap();
        assert!(path.starts_with(sysfs.driver_dir()));
        assert_eq!(sysfs.read_value(&path).unwrap(), "1");
    }
}
