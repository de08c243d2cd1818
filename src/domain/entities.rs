//! Domain entities: core data structures

use std::fmt;

use crate::domain::DomainError;

/// API credentials for the Duo Admin API.
///
/// Loaded once per process and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Integration key (`ikey`)
    pub integration_key: String,
    /// Secret key (`skey`), used only for request signing
    pub secret_key: String,
    /// API hostname (`host`), e.g. `api-xxxxxxxx.duosecurity.com`
    pub api_host: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("integration_key", &self.integration_key)
            .field("secret_key", &"<redacted>")
            .field("api_host", &self.api_host)
            .finish()
    }
}

/// Input for a single admin creation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRecord {
    pub email: String,
    pub name: String,
    /// Vendor-defined role, e.g. `Owner` or `Administrator`
    pub role: String,
    /// `None` when no phone was supplied (missing column, blank cell, skipped prompt)
    pub phone: Option<String>,
}

impl AdminRecord {
    /// Build a record from optional raw values.
    ///
    /// Values are trimmed. A missing or blank required value yields
    /// `DomainError::MissingField`, a blank phone becomes `None`.
    pub fn from_fields(
        row: usize,
        email: Option<&str>,
        name: Option<&str>,
        role: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            email: required(row, "Email", email)?,
            name: required(row, "Name", name)?,
            role: required(row, "Role", role)?,
            phone: optional(phone),
        })
    }
}

fn required(row: usize, field: &'static str, value: Option<&str>) -> Result<String, DomainError> {
    optional(value).ok_or(DomainError::MissingField { row, field })
}

/// Normalize an optional value: trimmed, blank collapses to `None`.
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Opaque admin identifier returned by the vendor after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdminId(String);

impl AdminId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdminId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of provisioning one admin: create, then activate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Admin created and activation email sent
    Created(AdminId),
    /// Creation failed; no activation was attempted
    CreateFailed { reason: String },
    /// Admin exists but the activation email failed (needs manual follow-up)
    ActivationFailed { admin_id: AdminId, reason: String },
}

impl ProvisionOutcome {
    pub fn admin_id(&self) -> Option<&AdminId> {
        match self {
            Self::Created(id) | Self::ActivationFailed { admin_id: id, .. } => Some(id),
            Self::CreateFailed { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// A registered second-factor phone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Phone {
    pub number: String,
    /// Device type, e.g. `mobile` or `landline`
    pub phone_type: String,
    /// Platform, e.g. `iOS` or `Android`
    pub platform: String,
}

/// A user together with the phones registered to them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct User {
    pub username: String,
    pub phones: Vec<Phone>,
}

/// One output row of the users/phones report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPhoneRow {
    pub username: String,
    pub phone_number: String,
    pub phone_type: String,
    pub phone_platform: String,
}

impl UserPhoneRow {
    pub const HEADER: [&'static str; 4] = ["Username", "Phone Number", "Type", "Platform"];

    pub fn new(user: &User, phone: &Phone) -> Self {
        Self {
            username: user.username.clone(),
            phone_number: phone.number.clone(),
            phone_type: phone.phone_type.clone(),
            phone_platform: phone.platform.clone(),
        }
    }

    pub fn as_record(&self) -> [&str; 4] {
        [
            &self.username,
            &self.phone_number,
            &self.phone_type,
            &self.phone_platform,
        ]
    }
}

/// Cross-join users with their phones, preserving the given order.
pub fn flatten_user_phones(users: &[User]) -> Vec<UserPhoneRow> {
    users
        .iter()
        .flat_map(|user| user.phones.iter().map(move |phone| UserPhoneRow::new(user, phone)))
        .collect()
}

/// Expand environment variables in a path string.
///
/// Supports `$VAR`, `${VAR}` and `~`.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_blank_phone_when_building_record_then_phone_is_none() {
        let record =
            AdminRecord::from_fields(1, Some("a@x.com"), Some("A"), Some("Owner"), Some("  "))
                .unwrap();
        assert_eq!(record.phone, None);
    }

    #[test]
    fn given_blank_name_when_building_record_then_missing_field() {
        let err = AdminRecord::from_fields(3, Some("a@x.com"), Some(""), Some("Owner"), None)
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingField {
                row: 3,
                field: "Name"
            }
        );
    }

    #[test]
    fn given_credentials_when_debug_formatting_then_secret_is_hidden() {
        let creds = Credentials {
            integration_key: "DIXXXX".into(),
            secret_key: "super-secret".into(),
            api_host: "api-1.duosecurity.com".into(),
        };
        let out = format!("{creds:?}");
        assert!(out.contains("DIXXXX"));
        assert!(!out.contains("super-secret"));
    }

    #[test]
    fn given_outcomes_when_asking_admin_id_then_only_created_ones_have_it() {
        let id = AdminId::new("DE123");
        assert_eq!(ProvisionOutcome::Created(id.clone()).admin_id(), Some(&id));
        assert_eq!(
            ProvisionOutcome::CreateFailed {
                reason: "dup".into()
            }
            .admin_id(),
            None
        );
    }
}
