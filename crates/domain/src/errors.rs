use thiserror::Error;

/// 领域校验错误。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid {field}: {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: &'static str,
    },
}

impl DomainError {
    pub fn invalid_argument(field: &'static str, reason: &'static str) -> Self {
        DomainError::InvalidArgument { field, reason }
    }
}

/// 外部存储协作方返回的错误。
///
/// 核心对持久化只做尽力而为的投递，这类错误最多记一条日志。
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("constraint violated: {0}")]
    Conflict(String),
}
