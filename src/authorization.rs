//! Role-based authorization for privileged task operations.
//!
//! Privileged lifecycle calls accept a [`Grant`] rather than a role. A grant
//! can only be obtained from an [`AuthorizationGate`], so holding one proves
//! the actor was looked up. The grant keeps the actor's role and company;
//! [`Grant::ensure_covers`] decides whether it reaches a given tenant's tasks.

use crate::identity::domain::{CompanyId, Role, UserId, UserIdentity};
use thiserror::Error;

/// Proof that a user passed a role check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    user_id: UserId,
    role: Role,
    company_id: CompanyId,
}

impl Grant {
    const fn issue(actor: &UserIdentity) -> Self {
        Self {
            user_id: actor.id(),
            role: actor.role(),
            company_id: actor.company_id(),
        }
    }

    /// Returns the user the grant was issued to.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the role that satisfied the check.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the company employing the grant holder.
    #[must_use]
    pub const fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Checks that the grant permits privileged work on tasks owned by
    /// `company_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::RoleNotPermitted`] unless the holder is
    /// an admin or supervisor, and [`AuthorizationError::ForeignCompany`]
    /// when the holder is employed by another company.
    pub fn ensure_covers(&self, company_id: CompanyId) -> Result<(), AuthorizationError> {
        if !Role::PRIVILEGED.contains(&self.role) {
            return Err(AuthorizationError::RoleNotPermitted {
                user_id: self.user_id,
                role: self.role,
            });
        }
        if self.company_id != company_id {
            return Err(AuthorizationError::ForeignCompany {
                user_id: self.user_id,
                company_id,
            });
        }
        Ok(())
    }
}

/// Errors returned when authorization is refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorizationError {
    /// The actor's role is not among the permitted roles.
    #[error("user {user_id} with role {role} is not permitted to perform this operation")]
    RoleNotPermitted {
        /// Refused user.
        user_id: UserId,
        /// Role the user holds.
        role: Role,
    },

    /// The actor acts on a task owned by a company that does not employ them.
    #[error("user {user_id} may not manage tasks of company {company_id}")]
    ForeignCompany {
        /// Refused user.
        user_id: UserId,
        /// Company owning the task.
        company_id: CompanyId,
    },
}

/// Issues grants for privileged operations.
pub trait AuthorizationGate: Send + Sync {
    /// Checks `actor` against `permitted` roles.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::RoleNotPermitted`] when the actor's
    /// role is not listed.
    fn authorize(
        &self,
        actor: &UserIdentity,
        permitted: &[Role],
    ) -> Result<Grant, AuthorizationError>;
}

/// Gate that admits an actor whose role is in the permitted list.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleGate;

impl RoleGate {
    /// Creates a role gate.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl AuthorizationGate for RoleGate {
    fn authorize(
        &self,
        actor: &UserIdentity,
        permitted: &[Role],
    ) -> Result<Grant, AuthorizationError> {
        if permitted.contains(&actor.role()) {
            Ok(Grant::issue(actor))
        } else {
            tracing::warn!(user_id = %actor.id(), role = %actor.role(), "authorization refused");
            Err(AuthorizationError::RoleNotPermitted {
                user_id: actor.id(),
                role: actor.role(),
            })
        }
    }
}
