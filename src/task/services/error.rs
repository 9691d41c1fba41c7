//! Service-level errors and their caller-facing classification.

use crate::authorization::AuthorizationError;
use crate::identity::{
    domain::{CompanyId, UserId},
    ports::IdentityDirectoryError,
};
use crate::task::{
    domain::{TaskDomainError, TaskId},
    ports::TaskRepositoryError,
};
use thiserror::Error;

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Clone, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or a lifecycle rule failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// Identity lookup failed.
    #[error(transparent)]
    Directory(#[from] IdentityDirectoryError),

    /// The acting user was refused a grant.
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    /// No task exists with the identifier.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The task exists but has no paired operation.
    #[error("task operation not found for task {0}")]
    OperationNotFound(TaskId),

    /// No user exists with the identifier.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// No company exists with the identifier.
    #[error("company not found: {0}")]
    CompanyNotFound(CompanyId),

    /// A user offered the task is employed by another company.
    #[error("user {user_id} is not employed by company {company_id}")]
    UserOutsideCompany {
        /// Rejected user.
        user_id: UserId,
        /// Company owning the task.
        company_id: CompanyId,
    },
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Caller-facing classification of a lifecycle failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced task, operation, user, or company is missing.
    NotFound,
    /// The task is not in the step the operation requires.
    InvalidTransition,
    /// Membership or role requirements are not met.
    Unauthorized,
    /// The input is malformed.
    Validation,
    /// Storage failed.
    Internal,
}

impl ErrorKind {
    /// Returns the HTTP status a transport layer should answer with.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::InvalidTransition => 409,
            Self::Unauthorized => 403,
            Self::Validation => 400,
            Self::Internal => 500,
        }
    }
}

impl TaskLifecycleError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) if err.is_validation() => ErrorKind::Validation,
            Self::Domain(TaskDomainError::InvalidStateTransition { .. })
            | Self::Repository(TaskRepositoryError::ConcurrentConflict { .. }) => {
                ErrorKind::InvalidTransition
            }
            Self::Domain(_) | Self::Authorization(_) | Self::UserOutsideCompany { .. } => {
                ErrorKind::Unauthorized
            }
            Self::Repository(TaskRepositoryError::NotFound(_))
            | Self::TaskNotFound(_)
            | Self::OperationNotFound(_)
            | Self::UserNotFound(_)
            | Self::CompanyNotFound(_) => ErrorKind::NotFound,
            Self::Repository(TaskRepositoryError::Persistence(_)) | Self::Directory(_) => {
                ErrorKind::Internal
            }
        }
    }
}
