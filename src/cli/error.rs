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

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::Infra(InfraError::from(e))
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                    crate::exitcode::NOINPUT
                }
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Parse { .. } => crate::exitcode::DATAERR,
                InfraError::Application(ApplicationError::Config { .. }) => {
                    crate::exitcode::CONFIG
                }
                InfraError::Application(ApplicationError::Domain(d)) => match d {
                    DomainError::MalformedHierarchy { .. } | DomainError::InvalidColor(_) => {
                        crate::exitcode::DATAERR
                    }
                    DomainError::UnknownRelationMode(_)
                    | DomainError::UnknownOption { .. }
                    | DomainError::NodeNotFound(_) => crate::exitcode::USAGE,
                },
                InfraError::Application(ApplicationError::OperationFailed { .. }) => {
                    crate::exitcode::SOFTWARE
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_hierarchy_maps_to_dataerr() {
        let err = CliError::from(DomainError::MalformedHierarchy {
            path: "Root/A".into(),
            reason: "expected object".into(),
        });
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn unknown_mode_maps_to_usage() {
        let err = CliError::from(DomainError::UnknownRelationMode("sideways".into()));
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }
}
