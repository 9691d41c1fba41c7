//! Identity snapshot of an acting user.

use super::{CompanyId, Role, UserId};
use serde::{Deserialize, Serialize};

/// The subset of a user record the lifecycle core reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserIdentity {
    id: UserId,
    role: Role,
    company_id: CompanyId,
}

impl UserIdentity {
    /// Creates an identity snapshot.
    #[must_use]
    pub const fn new(id: UserId, role: Role, company_id: CompanyId) -> Self {
        Self {
            id,
            role,
            company_id,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the company employing the user.
    #[must_use]
    pub const fn company_id(&self) -> CompanyId {
        self.company_id
    }
}
