//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

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
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Api(_) => crate::exitcode::SOFTWARE,
                InfraError::Application(app) => match app {
                    ApplicationError::ConfigNotFound(_) => crate::exitcode::NOINPUT,
                    ApplicationError::ConfigParse { .. } => crate::exitcode::DATAERR,
                    ApplicationError::ConfigIncomplete { .. } | ApplicationError::Config { .. } => {
                        crate::exitcode::CONFIG
                    }
                    ApplicationError::RemoteList { .. } => crate::exitcode::UNAVAILABLE,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                    _ => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn given_config_errors_when_mapping_exit_code_then_sysexits_values() {
        let not_found: CliError = ApplicationError::ConfigNotFound(PathBuf::from("x")).into();
        let parse: CliError = ApplicationError::ConfigParse {
            path: PathBuf::from("x"),
            message: "bad".into(),
        }
        .into();
        let incomplete: CliError = ApplicationError::ConfigIncomplete {
            path: PathBuf::from("x"),
            missing: vec!["skey"],
        }
        .into();

        assert_eq!(not_found.exit_code(), crate::exitcode::NOINPUT);
        assert_eq!(parse.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(incomplete.exit_code(), crate::exitcode::CONFIG);
    }

    #[test]
    fn given_list_failure_when_mapping_exit_code_then_unavailable() {
        let err: CliError = ApplicationError::RemoteList {
            reason: "timeout".into(),
        }
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::UNAVAILABLE);
    }
}
