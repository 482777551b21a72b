//! Authorization roles.

use serde::{Deserialize, Serialize};

/// Coarse authorization label attached to a user identity.
///
/// Role strings from the identity provider are compared case-insensitively:
/// exactly `ADMIN` (in any casing) grants admin rights, every other value -
/// including an absent one - resolves to [`Role::Standard`], the least
/// privileged role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Unrestricted visibility and access to administrative operations.
    Admin,
    /// Sees only shipments they created; no administrative operations.
    #[default]
    Standard,
}

impl Role {
    /// Resolve a role from an optional raw string.
    ///
    /// This parse is lossy on purpose: unknown labels mean least privilege,
    /// never an error.
    #[must_use]
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.trim().eq_ignore_ascii_case("admin") => Self::Admin,
            _ => Self::Standard,
        }
    }

    /// Whether this role grants access to admin-only operations.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// The canonical uppercase label for this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Standard => "STANDARD",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::resolve(Some(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_admin_case_insensitive() {
        assert_eq!(Role::resolve(Some("ADMIN")), Role::Admin);
        assert_eq!(Role::resolve(Some("admin")), Role::Admin);
        assert_eq!(Role::resolve(Some("Admin")), Role::Admin);
        assert_eq!(Role::resolve(Some(" admin ")), Role::Admin);
    }

    #[test]
    fn test_resolve_defaults_to_least_privilege() {
        assert_eq!(Role::resolve(None), Role::Standard);
        assert_eq!(Role::resolve(Some("")), Role::Standard);
        assert_eq!(Role::resolve(Some("superadmin")), Role::Standard);
        assert_eq!(Role::resolve(Some("root")), Role::Standard);
        assert_eq!(Role::resolve(Some("ADMINISTRATOR")), Role::Standard);
    }

    #[test]
    fn test_is_admin() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Standard.is_admin());
    }

    #[test]
    fn test_display() {
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert_eq!(Role::Standard.to_string(), "STANDARD");
    }

    #[test]
    fn test_default() {
        assert_eq!(Role::default(), Role::Standard);
    }
}
