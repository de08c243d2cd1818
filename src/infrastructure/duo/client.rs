//! Blocking Duo Admin API client

use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, DATE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::signing;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{AdminId, AdminRecord, Credentials, Phone, User};
use crate::infrastructure::error::ApiError;
use crate::infrastructure::traits::AdminApi;

/// Admins collection endpoint.
pub const ADMINS_PATH: &str = "/admin/v1/admins";

/// Users collection endpoint.
pub const USERS_PATH: &str = "/admin/v1/users";

/// The API still requires a password on admin creation; login uses the activation link.
pub const PLACEHOLDER_PASSWORD: &str = "dummy_password";

/// Largest page size the users endpoint accepts.
pub const MAX_PAGE_LIMIT: u32 = 300;

/// Path of the activation-link-by-email endpoint for one admin.
pub fn activation_email_path(admin_id: &AdminId) -> String {
    format!(
        "{}/{}/activation_link/email",
        ADMINS_PATH,
        signing::encode(admin_id.as_str())
    )
}

/// Response envelope shared by all Admin API endpoints.
#[derive(Debug, Deserialize)]
struct Envelope {
    stat: String,
    #[serde(default)]
    response: Option<Value>,
    #[serde(default)]
    metadata: Option<Metadata>,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    message_detail: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Metadata {
    #[serde(default)]
    next_offset: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CreatedAdmin {
    admin_id: String,
}

#[derive(Debug, Deserialize)]
struct UserDto {
    username: String,
    #[serde(default)]
    phones: Vec<PhoneDto>,
}

#[derive(Debug, Deserialize)]
struct PhoneDto {
    #[serde(default)]
    number: Option<String>,
    #[serde(default, rename = "type")]
    phone_type: Option<String>,
    #[serde(default)]
    platform: Option<String>,
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self {
            username: dto.username,
            phones: dto
                .phones
                .into_iter()
                .map(|p| Phone {
                    number: p.number.unwrap_or_default(),
                    phone_type: p.phone_type.unwrap_or_default(),
                    platform: p.platform.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

/// Signed, single-attempt client for the Duo Admin API.
pub struct DuoAdminClient {
    http: Client,
    credentials: Credentials,
    base_url: String,
    page_limit: u32,
}

impl DuoAdminClient {
    /// Client for `https://<api_host>`.
    pub fn new(credentials: Credentials, page_limit: u32) -> Result<Self, ApiError> {
        let base_url = format!("https://{}", credentials.api_host);
        Self::with_base_url(credentials, base_url, page_limit)
    }

    /// Client for an explicit base URL; the signature still uses `api_host`.
    pub fn with_base_url(
        credentials: Credentials,
        base_url: impl Into<String>,
        page_limit: u32,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("duo-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            credentials,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_limit: page_limit.clamp(1, MAX_PAGE_LIMIT),
        })
    }

    /// Perform one signed call and unwrap the response envelope.
    fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<(T, Metadata), ApiError> {
        let canon = signing::canonical_params(params);
        let date = signing::request_date(Utc::now());
        let auth = signing::authorization(&self.credentials, &date, method.as_str(), path, &canon);

        // GET/DELETE carry params in the query string, everything else in a form body
        let in_query = method == Method::GET || method == Method::DELETE;
        let url = if in_query && !canon.is_empty() {
            format!("{}{}?{}", self.base_url, path, canon)
        } else {
            format!("{}{}", self.base_url, path)
        };

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(DATE, &date)
            .header(AUTHORIZATION, auth);
        if !in_query {
            request = request
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(canon);
        }

        debug!("{} {}", method, path);
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        let envelope: Envelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(ApiError::Decode(e.to_string())),
            Err(_) => {
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        };

        if envelope.stat != "OK" {
            return Err(ApiError::Api {
                code: envelope.code.unwrap_or_else(|| i64::from(status.as_u16())),
                message: envelope.message.unwrap_or_else(|| envelope.stat.clone()),
                detail: envelope.message_detail,
            });
        }

        let response = envelope.response.unwrap_or(Value::Null);
        let parsed = serde_json::from_value(response).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok((parsed, envelope.metadata.unwrap_or_default()))
    }

    fn create_params(record: &AdminRecord) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("email", record.email.clone()),
            ("name", record.name.clone()),
            ("role", record.role.clone()),
            ("password", PLACEHOLDER_PASSWORD.to_string()),
        ];
        if let Some(phone) = &record.phone {
            params.push(("phone", phone.clone()));
        }
        params
    }
}

impl AdminApi for DuoAdminClient {
    #[instrument(skip(self, record), fields(email = %record.email, role = %record.role))]
    fn create_admin(&self, record: &AdminRecord) -> ApplicationResult<AdminId> {
        let params = Self::create_params(record);
        let (created, _): (CreatedAdmin, _) = self
            .call(Method::POST, ADMINS_PATH, &params)
            .map_err(|e| ApplicationError::RemoteCreate {
                reason: e.to_string(),
            })?;
        debug!("created admin_id={}", created.admin_id);
        Ok(AdminId::new(created.admin_id))
    }

    #[instrument(skip(self))]
    fn send_activation_email(&self, admin_id: &AdminId) -> ApplicationResult<()> {
        let path = activation_email_path(admin_id);
        let _: (Value, _) = self.call(Method::POST, &path, &[]).map_err(|e| {
            ApplicationError::RemoteActivation {
                admin_id: admin_id.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(())
    }

    #[instrument(skip(self))]
    fn list_users_with_phones(&self) -> ApplicationResult<Vec<User>> {
        let mut users = Vec::new();
        let mut offset: u64 = 0;

        loop {
            let params = [
                ("limit", self.page_limit.to_string()),
                ("offset", offset.to_string()),
            ];
            let (page, metadata): (Vec<UserDto>, _) = self
                .call(Method::GET, USERS_PATH, &params)
                .map_err(|e| ApplicationError::RemoteList {
                    reason: e.to_string(),
                })?;
            debug!("fetched {} users at offset {}", page.len(), offset);
            users.extend(page.into_iter().map(User::from));

            match metadata.next_offset.as_ref().and_then(Value::as_u64) {
                Some(next) if next > offset => offset = next,
                Some(next) => {
                    warn!("ignoring non-advancing next_offset {} (offset {})", next, offset);
                    break;
                }
                None => break,
            }
        }

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_record_without_phone_when_building_params_then_phone_omitted() {
        let record = AdminRecord {
            email: "a@x.com".into(),
            name: "A".into(),
            role: "Owner".into(),
            phone: None,
        };
        let params = DuoAdminClient::create_params(&record);
        assert!(params.iter().all(|(k, _)| *k != "phone"));
        assert!(params
            .iter()
            .any(|(k, v)| *k == "password" && v == PLACEHOLDER_PASSWORD));
    }

    #[test]
    fn given_admin_id_when_building_activation_path_then_id_is_embedded() {
        assert_eq!(
            activation_email_path(&AdminId::new("DEABC123")),
            "/admin/v1/admins/DEABC123/activation_link/email"
        );
    }
}
