//! In-memory identity directory for tests and local wiring.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::identity::{
    domain::{CompanyId, Role, UserId, UserIdentity},
    ports::{IdentityDirectory, IdentityDirectoryError, IdentityDirectoryResult},
};

/// Thread-safe in-memory directory of users and companies.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<UserId, UserIdentity>,
    companies: HashSet<CompanyId>,
}

fn poisoned(err: impl ToString) -> IdentityDirectoryError {
    IdentityDirectoryError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryIdentityDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a company.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDirectoryError::Persistence`] if the lock is poisoned.
    pub fn add_company(&self, id: CompanyId) -> IdentityDirectoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.companies.insert(id);
        Ok(())
    }

    /// Registers a user, implicitly registering their company.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDirectoryError::Persistence`] if the lock is poisoned.
    pub fn add_user(
        &self,
        id: UserId,
        role: Role,
        company_id: CompanyId,
    ) -> IdentityDirectoryResult<UserIdentity> {
        let identity = UserIdentity::new(id, role, company_id);
        let mut state = self.state.write().map_err(poisoned)?;
        state.companies.insert(company_id);
        state.users.insert(id, identity);
        Ok(identity)
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryIdentityDirectory {
    async fn find_user(&self, id: UserId) -> IdentityDirectoryResult<Option<UserIdentity>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.users.get(&id).copied())
    }

    async fn company_exists(&self, id: CompanyId) -> IdentityDirectoryResult<bool> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.companies.contains(&id))
    }
}
