//! Tests for CredentialLoader

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use duo_admin::application::services::CredentialLoader;
use duo_admin::application::ApplicationError;
use duo_admin::infrastructure::traits::RealFileSystem;

/// Helper to create a credentials file for testing
fn create_credentials_file(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("duo_config.json");
    std::fs::write(&path, content).expect("write credentials file");
    path
}

fn loader() -> CredentialLoader {
    CredentialLoader::new(Arc::new(RealFileSystem))
}

#[test]
fn given_complete_file_when_loading_then_returns_credentials() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_credentials_file(
        &temp,
        r#"{"ikey": "DIXXXXXXXXXXXXXXXXXX", "skey": "secret", "host": "api-1234.duosecurity.com"}"#,
    );

    // Act
    let creds = loader().load(&path).unwrap();

    // Assert
    assert_eq!(creds.integration_key, "DIXXXXXXXXXXXXXXXXXX");
    assert_eq!(creds.secret_key, "secret");
    assert_eq!(creds.api_host, "api-1234.duosecurity.com");
}

#[test]
fn given_missing_file_when_loading_then_config_not_found() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nope.json");

    // Act
    let err = loader().load(&path).unwrap_err();

    // Assert
    assert!(matches!(err, ApplicationError::ConfigNotFound(p) if p == path));
}

#[test]
fn given_invalid_json_when_loading_then_config_parse_error() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_credentials_file(&temp, "ikey = not json");

    // Act
    let err = loader().load(&path).unwrap_err();

    // Assert
    assert!(matches!(err, ApplicationError::ConfigParse { .. }));
}

#[test]
fn given_json_array_when_loading_then_config_parse_error() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_credentials_file(&temp, r#"["ikey", "skey", "host"]"#);

    // Act
    let err = loader().load(&path).unwrap_err();

    // Assert
    assert!(matches!(err, ApplicationError::ConfigParse { .. }));
}

#[test]
fn given_missing_fields_when_loading_then_config_incomplete_lists_them() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_credentials_file(&temp, r#"{"ikey": "DI123", "host": "  "}"#);

    // Act
    let err = loader().load(&path).unwrap_err();

    // Assert - blank host counts as missing
    match err {
        ApplicationError::ConfigIncomplete { missing, .. } => {
            assert_eq!(missing, vec!["skey", "host"]);
        }
        other => panic!("expected ConfigIncomplete, got {other:?}"),
    }
}

#[test]
fn given_extra_fields_when_loading_then_ignored() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_credentials_file(
        &temp,
        r#"{"ikey": "DI1", "skey": "s", "host": "h", "comment": "prod tenant"}"#,
    );

    // Act
    let creds = loader().load(&path).unwrap();

    // Assert
    assert_eq!(creds.api_host, "h");
}

#[test]
fn given_path_with_env_var_when_loading_then_expands_it() {
    // Arrange
    let temp = TempDir::new().unwrap();
    create_credentials_file(&temp, r#"{"ikey": "DI1", "skey": "s", "host": "h"}"#);
    std::env::set_var("DUO_ADMIN_TEST_CRED_DIR", temp.path());

    // Act
    let creds = loader()
        .load(&PathBuf::from("$DUO_ADMIN_TEST_CRED_DIR/duo_config.json"))
        .unwrap();

    // Assert
    assert_eq!(creds.integration_key, "DI1");

    // Cleanup
    std::env::remove_var("DUO_ADMIN_TEST_CRED_DIR");
}

#[test]
fn given_json_scalar_when_loading_then_config_parse_error() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_credentials_file(&temp, r#""DI1:secret@host""#);

    // Act
    let err = loader().load(&path).unwrap_err();

    // Assert
    match err {
        ApplicationError::ConfigParse { message, .. } => {
            assert_eq!(message, "expected a JSON object");
        }
        other => panic!("expected ConfigParse, got {other:?}"),
    }
}
