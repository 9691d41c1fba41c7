//! Error types for identity parsing.

use thiserror::Error;

/// Error returned while parsing a role from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user role: {0}")]
pub struct ParseRoleError(pub String);
