//! Application-level errors

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::AdminId;

/// Application errors: configuration, remote API and I/O failures.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("credentials file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("cannot parse credentials file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("credentials file {path} is missing: {}", .missing.join(", "))]
    ConfigIncomplete {
        path: PathBuf,
        missing: Vec<&'static str>,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("create admin failed: {reason}")]
    RemoteCreate { reason: String },

    #[error("activation email for admin_id {admin_id} failed: {reason}")]
    RemoteActivation { admin_id: AdminId, reason: String },

    #[error("listing users failed: {reason}")]
    RemoteList { reason: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
