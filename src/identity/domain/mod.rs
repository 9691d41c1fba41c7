//! Domain model for acting users and their companies.

mod error;
mod ids;
mod role;
mod user;

pub use error::ParseRoleError;
pub use ids::{CompanyId, UserId};
pub use role::Role;
pub use user::UserIdentity;
