//! Read-only directory of users and companies.

use crate::identity::domain::{CompanyId, UserId, UserIdentity};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for identity directory lookups.
pub type IdentityDirectoryResult<T> = Result<T, IdentityDirectoryError>;

/// Identity lookup contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Finds a user by identifier.
    ///
    /// Returns `None` when the user does not exist.
    async fn find_user(&self, id: UserId) -> IdentityDirectoryResult<Option<UserIdentity>>;

    /// Returns whether a company with the given identifier exists.
    async fn company_exists(&self, id: CompanyId) -> IdentityDirectoryResult<bool>;
}

/// Errors returned by identity directory implementations.
#[derive(Debug, Clone, Error)]
pub enum IdentityDirectoryError {
    /// A stored role value could not be interpreted.
    #[error("user {user_id} has an unreadable role: {source}")]
    CorruptRole {
        /// Affected user.
        user_id: UserId,
        /// Parse failure.
        source: crate::identity::domain::ParseRoleError,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
