//! Port contracts for identity lookups.

pub mod directory;

#[cfg(test)]
pub use directory::MockIdentityDirectory;
pub use directory::{IdentityDirectory, IdentityDirectoryError, IdentityDirectoryResult};
