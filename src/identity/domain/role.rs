//! User roles used for lifecycle gating.

use super::ParseRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role held by a user within their company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular employee.
    User,
    /// Team lead; the only role that may claim or complete group tasks.
    Head,
    /// Company supervisor; may create, verify, and reject tasks.
    Supervisor,
    /// Administrator with the same task privileges as a supervisor.
    Admin,
}

impl Role {
    /// Roles permitted to create, verify, reject, edit, and delete tasks.
    pub const PRIVILEGED: [Self; 2] = [Self::Admin, Self::Supervisor];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Head => "head",
            Self::Supervisor => "supervisor",
            Self::Admin => "admin",
        }
    }

    /// Returns whether this role may act on behalf of a group task team.
    #[must_use]
    pub const fn is_head(self) -> bool {
        matches!(self, Self::Head)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "user" => Ok(Self::User),
            "head" => Ok(Self::Head),
            "supervisor" => Ok(Self::Supervisor),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}
