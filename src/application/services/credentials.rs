//! Credential file loading
//!
//! The credentials file is a JSON object with `ikey`, `skey` and `host`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{expand_env_vars, optional, Credentials};
use crate::infrastructure::traits::FileSystem;

/// Raw file contents; every field optional so missing ones can be reported together.
#[derive(Debug, Default, Deserialize)]
struct RawCredentials {
    ikey: Option<String>,
    skey: Option<String>,
    host: Option<String>,
}

/// Loads `Credentials` from a JSON file.
pub struct CredentialLoader {
    fs: Arc<dyn FileSystem>,
}

impl CredentialLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and validate the credentials file at `path`.
    ///
    /// `~` and `$VAR` in the path are expanded first.
    #[instrument(skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Credentials> {
        let path = PathBuf::from(expand_env_vars(&path.to_string_lossy()));
        if !self.fs.exists(&path) {
            return Err(ApplicationError::ConfigNotFound(path));
        }

        let content = self
            .fs
            .read_to_string(&path)
            .with_path_context("read credentials file", &path)?;
        let parse_err = |message: String| ApplicationError::ConfigParse {
            path: path.clone(),
            message,
        };
        // serde would also map a JSON array onto the struct positionally
        let value: Value = serde_json::from_str(&content).map_err(|e| parse_err(e.to_string()))?;
        if !value.is_object() {
            return Err(parse_err("expected a JSON object".to_string()));
        }
        let raw: RawCredentials =
            serde_json::from_value(value).map_err(|e| parse_err(e.to_string()))?;

        let ikey = optional(raw.ikey.as_deref());
        let skey = optional(raw.skey.as_deref());
        let host = optional(raw.host.as_deref());

        match (ikey, skey, host) {
            (Some(integration_key), Some(secret_key), Some(api_host)) => {
                debug!("loaded credentials for host {}", api_host);
                Ok(Credentials {
                    integration_key,
                    secret_key,
                    api_host,
                })
            }
            (ikey, skey, host) => {
                let missing = [
                    ("ikey", ikey.is_none()),
                    ("skey", skey.is_none()),
                    ("host", host.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
                Err(ApplicationError::ConfigIncomplete { path, missing })
            }
        }
    }
}
