//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::AlreadyExists(_) => crate::exitcode::CANTCREAT,
                InfraError::Application(app) => match app {
                    ApplicationError::RosterNotFound(_) => crate::exitcode::NOINPUT,
                    ApplicationError::InvalidRoster { .. } => crate::exitcode::DATAERR,
                    ApplicationError::Domain(
                        DomainError::DuplicateEmployeeId(_) | DomainError::UnknownEmployee(_),
                    ) => crate::exitcode::DATAERR,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                    ApplicationError::ValidationNotRun => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_roster_error_when_mapping_then_dataerr() {
        let err: CliError = ApplicationError::InvalidRoster {
            line: 1,
            message: "bad".into(),
        }
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_unknown_employee_when_mapping_then_dataerr() {
        let err: CliError =
            ApplicationError::from(DomainError::UnknownEmployee("7".into())).into();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(err.to_string(), "unknown employee id: 7");
    }

    #[test]
    fn given_missing_roster_when_mapping_then_noinput() {
        let err: CliError = ApplicationError::RosterNotFound("staff.csv".into()).into();
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
        assert_eq!(err.to_string(), "roster not found: staff.csv");
    }
}
