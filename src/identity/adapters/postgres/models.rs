//! Diesel row models for identity lookups.

use super::schema::users;
use diesel::prelude::*;

/// Query result row for the columns of `users` the core reads.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: i64,
    /// Role in canonical string form.
    pub role: String,
    /// Employing company.
    pub company_id: i64,
}
