//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/duo-admin/duo-admin.toml`
//! 3. Environment variables: `DUO_ADMIN_*` prefix
//!
//! These are tool settings only. API credentials live in their own JSON
//! file, located via `credentials_file`.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;
use crate::infrastructure::duo::MAX_PAGE_LIMIT;

/// Raw settings for intermediate parsing (Option = "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub credentials_file: Option<PathBuf>,
    pub page_limit: Option<u32>,
}

/// Unified configuration for duo-admin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// JSON file holding `ikey`, `skey` and `host`
    pub credentials_file: PathBuf,
    /// Page size when listing users (1..=300)
    pub page_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials_file: default_credentials_file(),
            page_limit: MAX_PAGE_LIMIT,
        }
    }
}

fn default_credentials_file() -> PathBuf {
    global_config_dir()
        .map(|dir| dir.join("duo_config.json"))
        .unwrap_or_else(|| PathBuf::from("duo_config.json"))
}

/// Get the XDG config directory for duo-admin.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "duo-admin").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("duo-admin.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.credentials_file.to_string_lossy().as_ref());
        self.credentials_file = PathBuf::from(expanded);
    }

    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            credentials_file: overlay
                .credentials_file
                .clone()
                .unwrap_or_else(|| self.credentials_file.clone()),
            page_limit: overlay.page_limit.unwrap_or(self.page_limit),
        }
    }

    /// Load settings with layered precedence (defaults, global file, env vars).
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings using an explicit config file instead of the global one.
    ///
    /// A `None` or non-existent path just skips the file layer.
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = config_file {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.page_limit = current.page_limit.clamp(1, MAX_PAGE_LIMIT);

        Ok(current)
    }

    /// Apply DUO_ADMIN_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("DUO_ADMIN")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("credentials_file") {
            settings.credentials_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("page_limit") {
            settings.page_limit = val.trim().parse().map_err(|e| ApplicationError::Config {
                message: format!("DUO_ADMIN_PAGE_LIMIT={val}: {e}"),
            })?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# duo-admin configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/duo-admin/duo-admin.toml
#   Env:    DUO_ADMIN_* environment variables (explicit overrides)
#   CLI:    --credentials overrides credentials_file

# JSON file with the Admin API credentials:
#   { "ikey": "...", "skey": "...", "host": "api-xxxxxxxx.duosecurity.com" }
# credentials_file = "~/.config/duo-admin/duo_config.json"

# Users fetched per request when building the phone report (max 300)
# page_limit = 300
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_template_when_parsing_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.credentials_file.is_none());
        assert!(raw.page_limit.is_none());
    }

    #[test]
    fn given_overlay_when_merging_then_specified_fields_win() {
        let base = Settings {
            credentials_file: PathBuf::from("/a.json"),
            page_limit: 300,
        };
        let merged = base.merge_with(&RawSettings {
            credentials_file: None,
            page_limit: Some(50),
        });
        assert_eq!(merged.credentials_file, PathBuf::from("/a.json"));
        assert_eq!(merged.page_limit, 50);
    }
}
