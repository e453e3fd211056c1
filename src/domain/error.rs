//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate employee id: {0}")]
    DuplicateEmployeeId(String),

    #[error("unknown employee id: {0}")]
    UnknownEmployee(String),
}
