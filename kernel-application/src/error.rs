use kernel_domain::error::DomainError;
use kernel_domain::persist::CommitError;
use kernel_domain::uniqueness::{UnavailableError, UniquenessClaim};

/// 稳定的错误分类，调用方据此渲染提示而无需匹配字符串
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    InvalidIdentity,
    InvariantViolation,
    RuleViolation,
    AlreadyTaken,
    Unavailable,
    ConcurrencyConflict,
    Storage,
    Serialization,
    Internal,
}

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("already taken: {scope}.{field}={value}")]
    AlreadyTaken {
        scope: String,
        field: String,
        value: String,
    },

    #[error(transparent)]
    Unavailable(#[from] UnavailableError),

    #[error("commit: {0}")]
    Commit(#[from] CommitError),
}

impl AppError {
    pub fn already_taken(claim: &UniquenessClaim) -> Self {
        Self::AlreadyTaken {
            scope: claim.scope().to_string(),
            field: claim.field().to_string(),
            value: claim.display_value(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => match err {
                DomainError::Validation(_) => ErrorKind::Validation,
                DomainError::InvalidIdentity { .. } => ErrorKind::InvalidIdentity,
                DomainError::InvariantViolation { .. } => ErrorKind::InvariantViolation,
                DomainError::RuleViolation { .. } => ErrorKind::RuleViolation,
                DomainError::TypeMismatch { .. } | DomainError::Serde { .. } => {
                    ErrorKind::Serialization
                }
                _ => ErrorKind::Internal,
            },
            Self::AlreadyTaken { .. } => ErrorKind::AlreadyTaken,
            Self::Unavailable(_) => ErrorKind::Unavailable,
            Self::Commit(err) => match err {
                CommitError::ConcurrencyConflict { .. } => ErrorKind::ConcurrencyConflict,
                CommitError::Storage { .. } => ErrorKind::Storage,
                _ => ErrorKind::Internal,
            },
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
