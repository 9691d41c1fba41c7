//! `PostgreSQL` implementation of the identity directory.

use super::{
    models::UserRow,
    schema::{companies, users},
};
use crate::config::PgPool;
use crate::identity::{
    domain::{CompanyId, Role, UserId, UserIdentity},
    ports::{IdentityDirectory, IdentityDirectoryError, IdentityDirectoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed identity directory.
#[derive(Debug, Clone)]
pub struct PostgresIdentityDirectory {
    pool: PgPool,
}

impl PostgresIdentityDirectory {
    /// Creates a directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> IdentityDirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> IdentityDirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(IdentityDirectoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(IdentityDirectoryError::persistence)?
    }
}

#[async_trait]
impl IdentityDirectory for PostgresIdentityDirectory {
    async fn find_user(&self, id: UserId) -> IdentityDirectoryResult<Option<UserIdentity>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.value()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(IdentityDirectoryError::persistence)?;
            row.map(row_to_identity).transpose()
        })
        .await
    }

    async fn company_exists(&self, id: CompanyId) -> IdentityDirectoryResult<bool> {
        self.run_blocking(move |connection| {
            diesel::select(diesel::dsl::exists(
                companies::table.filter(companies::id.eq(id.value())),
            ))
            .get_result::<bool>(connection)
            .map_err(IdentityDirectoryError::persistence)
        })
        .await
    }
}

fn row_to_identity(row: UserRow) -> IdentityDirectoryResult<UserIdentity> {
    let user_id = UserId::new(row.id);
    let role = Role::try_from(row.role.as_str())
        .map_err(|source| IdentityDirectoryError::CorruptRole { user_id, source })?;
    Ok(UserIdentity::new(
        user_id,
        role,
        CompanyId::new(row.company_id),
    ))
}
