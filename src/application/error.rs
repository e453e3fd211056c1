//! Application-level errors (wraps domain errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("validation has not been run: run validation before requesting employee details")]
    ValidationNotRun,

    #[error("roster not found: {}", .0.display())]
    RosterNotFound(PathBuf),

    #[error("invalid roster at line {line}: {message}")]
    InvalidRoster { line: usize, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
