//! Process privilege checks
//!
//! Writing `conservation_mode` needs root. The check runs once, before anything touches sysfs.

use crate::ControlError;

/// Source of the process's effective identity
pub trait Privileges {
    /// Effective user id
    fn effective_uid(&self) -> u32;

    fn is_superuser(&self) -> bool {
        self.effective_uid() == 0
    }
}

/// Privileges of the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPrivileges;

impl Privileges for SystemPrivileges {
    fn effective_uid(&self) -> u32 {
        nix::unistd::geteuid().as_raw()
    }
}

/// Fail unless the effective user is root
pub fn require_superuser<P: Privileges + ?Sized>(privileges: &P) -> Result<(), ControlError> {
    if privileges.is_superuser() {
        return Ok(());
    }

    let euid = privileges.effective_uid();
    tracing::debug!("Refusing to run with effective uid {}", euid);
    Err(ControlError::InsufficientPrivilege { euid })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPrivileges;

    #[test]
    fn test_root_passes() {
        assert!(require_superuser(&MockPrivileges::root()).is_ok());
    }

    #[test]
    fn test_regular_user_fails() {
        let err = require_superuser(&MockPrivileges::user(1000)).unwrap_err();
        assert!(matches!(err, ControlError::InsufficientPrivilege { euid: 1000 }));
    }

    #[test]
    fn test_system_privileges_match_process() {
        let system = SystemPrivileges;
        assert_eq!(system.effective_uid(), nix::unistd::geteuid().as_raw());
        assert_eq!(system.is_superuser(), nix::unistd::geteuid().is_root());
    }
}
