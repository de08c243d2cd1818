//! Tests for DuoAdminClient against a local HTTP double

use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_string_contains, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use duo_admin::application::ApplicationError;
use duo_admin::domain::{AdminId, AdminRecord, Credentials};
use duo_admin::infrastructure::duo::DuoAdminClient;
use duo_admin::infrastructure::traits::AdminApi;
use duo_admin::util::testing::init_test_setup;

fn credentials() -> Credentials {
    Credentials {
        integration_key: "DIWJ8X6AEYOR5OMC6TQ1".to_string(),
        secret_key: "gtdfxv9YgVBYcF6dl2Eq17KUQJN2PLM2ODVTkvoT".to_string(),
        api_host: "api-test.duosecurity.com".to_string(),
    }
}

/// The mock server lives on the runtime; the blocking client runs on the test thread.
fn start_server() -> (Runtime, MockServer) {
    init_test_setup();
    let rt = Runtime::new().expect("tokio runtime");
    let server = rt.block_on(MockServer::start());
    (rt, server)
}

fn client(server: &MockServer, page_limit: u32) -> DuoAdminClient {
    DuoAdminClient::with_base_url(credentials(), server.uri(), page_limit).expect("client")
}

fn record(phone: Option<&str>) -> AdminRecord {
    AdminRecord {
        email: "a@x.com".to_string(),
        name: "Ada Admin".to_string(),
        role: "Owner".to_string(),
        phone: phone.map(str::to_string),
    }
}

#[test]
fn given_ok_envelope_when_creating_admin_then_returns_admin_id() {
    // Arrange
    let (rt, server) = start_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/admin/v1/admins"))
            .and(header_exists("authorization"))
            .and(header_exists("date"))
            .and(body_string_contains("email=a%40x.com"))
            .and(body_string_contains("password=dummy_password"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stat": "OK",
                "response": {"admin_id": "DE123", "email": "a@x.com"}
            })))
            .expect(1)
            .mount(&server),
    );

    // Act
    let id = client(&server, 300).create_admin(&record(None)).unwrap();

    // Assert
    assert_eq!(id, AdminId::new("DE123"));
    let requests = rt.block_on(server.received_requests()).unwrap();
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    assert!(!body.contains("phone="), "absent phone must be omitted: {body}");
    assert!(body.contains("name=Ada%20Admin"));
    let auth = requests[0].headers.get("authorization").unwrap();
    assert!(auth.to_str().unwrap().starts_with("Basic "));
}

#[test]
fn given_phone_when_creating_admin_then_phone_param_sent() {
    // Arrange
    let (rt, server) = start_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/admin/v1/admins"))
            .and(body_string_contains("phone=%2B15555550100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stat": "OK",
                "response": {"admin_id": "DE9"}
            })))
            .expect(1)
            .mount(&server),
    );

    // Act
    let id = client(&server, 300)
        .create_admin(&record(Some("+15555550100")))
        .unwrap();

    // Assert
    assert_eq!(id.as_str(), "DE9");
}

#[test]
fn given_fail_envelope_when_creating_admin_then_remote_create_with_detail() {
    // Arrange
    let (rt, server) = start_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/admin/v1/admins"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "stat": "FAIL",
                "code": 40003,
                "message": "Duplicate resource",
                "message_detail": "email"
            })))
            .mount(&server),
    );

    // Act
    let err = client(&server, 300).create_admin(&record(None)).unwrap_err();

    // Assert
    match err {
        ApplicationError::RemoteCreate { reason } => {
            assert_eq!(reason, "40003: Duplicate resource (email)");
        }
        other => panic!("expected RemoteCreate, got {other:?}"),
    }
}

#[test]
fn given_admin_id_when_sending_activation_then_posts_to_activation_endpoint() {
    // Arrange
    let (rt, server) = start_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/admin/v1/admins/DE123/activation_link/email"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stat": "OK",
                "response": {"email": "a@x.com", "valid_days": 7}
            })))
            .expect(1)
            .mount(&server),
    );

    // Act
    let result = client(&server, 300).send_activation_email(&AdminId::new("DE123"));

    // Assert
    assert!(result.is_ok());
}

#[test]
fn given_activation_failure_when_sending_then_remote_activation_keeps_id() {
    // Arrange
    let (rt, server) = start_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/admin/v1/admins/DE123/activation_link/email"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "stat": "FAIL",
                "code": 40401,
                "message": "Resource not found"
            })))
            .mount(&server),
    );

    // Act
    let err = client(&server, 300)
        .send_activation_email(&AdminId::new("DE123"))
        .unwrap_err();

    // Assert
    assert!(matches!(
        err,
        ApplicationError::RemoteActivation { ref admin_id, .. } if admin_id.as_str() == "DE123"
    ));
}

#[test]
fn given_paginated_users_when_listing_then_drains_all_pages_in_order() {
    // Arrange
    let (rt, server) = start_server();
    rt.block_on(async {
        Mock::given(method("GET"))
            .and(path("/admin/v1/users"))
            .and(query_param("limit", "2"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stat": "OK",
                "metadata": {"next_offset": 2, "total_objects": 3},
                "response": [
                    {"username": "u1", "phones": [
                        {"number": "1", "type": "mobile", "platform": "iOS"},
                        {"number": "2", "type": "mobile", "platform": "Android"}
                    ]},
                    {"username": "u2", "phones": []}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/admin/v1/users"))
            .and(query_param("offset", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stat": "OK",
                "metadata": {"total_objects": 3},
                "response": [
                    {"username": "u3", "phones": [
                        {"number": null, "type": "landline", "platform": null}
                    ]}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
    });

    // Act
    let users = client(&server, 2).list_users_with_phones().unwrap();

    // Assert
    let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["u1", "u2", "u3"]);
    assert_eq!(users[0].phones.len(), 2);
    assert_eq!(users[0].phones[1].platform, "Android");
    assert_eq!(users[2].phones[0].number, "");
    assert_eq!(users[2].phones[0].phone_type, "landline");
}

#[test]
fn given_non_json_error_when_listing_then_remote_list_names_status() {
    // Arrange
    let (rt, server) = start_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/admin/v1/users"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server),
    );

    // Act
    let err = client(&server, 300).list_users_with_phones().unwrap_err();

    // Assert
    match err {
        ApplicationError::RemoteList { reason } => assert!(reason.contains("502"), "{reason}"),
        other => panic!("expected RemoteList, got {other:?}"),
    }
}
