//! Mock backend tests for the confer HTTP layer.
//!
//! These tests use wiremock to simulate the conference backend and exercise
//! token injection, error shaping and refresh coordination end to end.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use confer_core::{
    AccessToken, ApiUrl, CredentialStore, Credentials, Error, ErrorKind, LoginCredentials,
    MemoryCredentialStore, RefreshToken, StoreError, UserType,
};
use confer_http::{
    ClientConfig, ConferClient, MeetingDecision, MeetingRequestAction, MultipartForm,
};
use futures_util::future::join_all;
use serde_json::json;
use wiremock::matchers::{body_json, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NETWORK_MESSAGE: &str = "Network error. Please check your internet connection and try again.";

/// Helper to create a client against a mock server.
fn client_for(server: &MockServer, credentials: Credentials) -> (ConferClient, Arc<MemoryCredentialStore>) {
    let store = Arc::new(MemoryCredentialStore::with_credentials(credentials));
    let config = ClientConfig::new(ApiUrl::new(server.uri()).unwrap());
    let client = ConferClient::new(config, store.clone()).unwrap();
    (client, store)
}

fn logged_in() -> Credentials {
    Credentials::new(
        AccessToken::new("T1"),
        Some(RefreshToken::new("R1")),
        Some(json!({"id": 7, "name": "Ada"})),
    )
}

fn gateway_error(err: &Error) -> &confer_core::GatewayError {
    err.as_gateway().expect("expected a gateway error")
}

async fn refresh_calls(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == "/auth/refresh-token")
        .count()
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_login_stores_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/delegate-login"))
        .and(body_json(json!({"email": "a@b.com", "password": "x"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "T1",
            "refresh_token": "R1",
            "data": {"id": 7}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server, Credentials::default());
    let credentials = LoginCredentials::new("a@b.com", "x", UserType::Delegate);
    client.login(&credentials).await.unwrap();

    let stored = store.load().await.unwrap();
    assert_eq!(stored.access_token, Some(AccessToken::new("T1")));
    assert_eq!(stored.refresh_token, Some(RefreshToken::new("R1")));
    assert_eq!(stored.principal, Some(json!({"id": 7})));
}

#[tokio::test]
async fn test_sponsor_login_uses_sponsor_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/sponsor-login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "S1"})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server, Credentials::default());
    let credentials = LoginCredentials::new("s@b.com", "x", UserType::Sponsor);
    client.login(&credentials).await.unwrap();

    let stored = store.load().await.unwrap();
    assert_eq!(stored.access_token, Some(AccessToken::new("S1")));
    assert_eq!(stored.refresh_token, None);
}

#[tokio::test]
async fn test_login_without_token_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/delegate-login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let (client, store) = client_for(&server, Credentials::default());
    let result = client
        .login(&LoginCredentials::new("a@b.com", "x", UserType::Delegate))
        .await;

    assert!(matches!(result, Err(Error::UnexpectedResponse { .. })));
    assert!(store.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_invalid_credentials_does_not_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/delegate-login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid email or password"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T2"})))
        .expect(0)
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server, Credentials::default());
    let err = client
        .login(&LoginCredentials::new("a@b.com", "wrong", UserType::Delegate))
        .await
        .unwrap_err();

    let err = gateway_error(&err);
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.message(), "Invalid email or password");
}

#[tokio::test]
async fn test_logout_clears_credentials_when_call_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server, logged_in());
    client.logout().await.unwrap();

    assert!(store.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_logout_sends_bearer_and_clears() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "bye"})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server, logged_in());
    client.logout().await.unwrap();

    assert!(store.load().await.unwrap().is_empty());
}

// ============================================================================
// Request Gateway Tests
// ============================================================================

#[tokio::test]
async fn test_bearer_and_json_headers_injected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/delegate/events"))
        .and(header("authorization", "Bearer T1"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server, logged_in());
    let events = client.events().await.unwrap();

    assert_eq!(events, json!([{"id": 1}]));
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/delegate/all-delegates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server, Credentials::default());
    client.all_delegates().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_path_and_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/agenda/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sessions": []})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/agenda/item/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/delegate/attendees"))
        .and(query_param("event_id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server, logged_in());
    assert_eq!(client.agenda("42").await.unwrap(), json!({"sessions": []}));
    assert_eq!(client.agenda_item("9").await.unwrap(), json!({"id": 9}));
    client.attendees(Some("42")).await.unwrap();
}

#[tokio::test]
async fn test_empty_path_parameter_rejected_before_sending() {
    let server = MockServer::start().await;
    let (client, _store) = client_for(&server, logged_in());

    let err = client.agenda("").await.unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_meeting_request_action_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/delegate/meeting-request-action"))
        .and(body_json(json!({"meeting_request_id": "5", "action": "accept"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Accepted"})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server, logged_in());
    let action = MeetingRequestAction {
        meeting_request_id: "5".into(),
        action: MeetingDecision::Accept,
    };
    let response = client.meeting_request_action(&action).await.unwrap();

    assert_eq!(response["message"], "Accepted");
}

#[tokio::test]
async fn test_update_profile_is_multipart() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/delegate/profile/update"))
        .and(header("authorization", "Bearer T1"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Saved"})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server, logged_in());
    let form = MultipartForm::new()
        .text("name", "Ada Lovelace")
        .file("photo", vec![0x89, 0x50, 0x4e, 0x47], "me.png", "image/png");
    client.update_profile(form).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("Ada Lovelace"));
    assert!(body.contains("filename=\"me.png\""));
}

#[tokio::test]
async fn test_non_json_success_returns_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/delegate-forgot-password"))
        .and(body_json(json!({"email": "a@b.com"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("OTP sent")
                .insert_header("content-type", "text/plain"),
        )
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server, Credentials::default());
    let response = client.forgot_password("a@b.com").await.unwrap();

    assert_eq!(response, json!("OTP sent"));
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[tokio::test]
async fn test_error_message_from_errors_array() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/verify-forgot-password-otp"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": ["E1", "E2"]
        })))
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server, Credentials::default());
    let err = client.verify_otp("a@b.com", "000000").await.unwrap_err();
    let err = gateway_error(&err);

    assert_eq!(err.kind(), ErrorKind::Http);
    assert_eq!(err.message(), "E1");
    let payload = err.payload();
    assert_eq!(payload.status, Some(422));
    assert_eq!(payload.raw_body, json!({"errors": ["E1", "E2"]}));
}

#[tokio::test]
async fn test_empty_error_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/delegate/profile"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server, logged_in());
    let err = client.profile().await.unwrap_err();

    assert_eq!(gateway_error(&err).message(), "HTTP error! status: 503");
}

#[tokio::test]
async fn test_network_unavailable() {
    // Bind then drop to get a port with nothing listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let store = Arc::new(MemoryCredentialStore::with_credentials(logged_in()));
    let config = ClientConfig::new(ApiUrl::new(format!("http://127.0.0.1:{}", port)).unwrap());
    let client = ConferClient::new(config, store.clone()).unwrap();

    let err = client.events().await.unwrap_err();
    let err = gateway_error(&err);

    assert_eq!(err.kind(), ErrorKind::NetworkUnavailable);
    assert_eq!(err.status(), None);
    assert_eq!(err.message(), NETWORK_MESSAGE);
    // No response means no refresh, and the session is untouched.
    assert!(store.load().await.unwrap().is_authenticated());
}

// ============================================================================
// Refresh Coordination Tests
// ============================================================================

#[tokio::test]
async fn test_expired_token_is_refreshed_and_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/delegate/review-meeting-request"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Token expired"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/delegate/review-meeting-request"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 3}])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .and(body_json(json!({"refresh_token": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "T2",
            "refresh_token": "R2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server, logged_in());
    let requests = client.meeting_requests().await.unwrap();

    assert_eq!(requests, json!([{"id": 3}]));
    let stored = store.load().await.unwrap();
    assert_eq!(stored.access_token, Some(AccessToken::new("T2")));
    assert_eq!(stored.refresh_token, Some(RefreshToken::new("R2")));
    assert_eq!(stored.principal, Some(json!({"id": 7, "name": "Ada"})));
    assert!(!client.coordinator().is_refreshing());
}

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    let server = MockServer::start().await;
    let refresh_delay = Duration::from_millis(300);

    Mock::given(method("GET"))
        .and(path("/delegate/events"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(5)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/delegate/events"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(5)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": "T2"}))
                .set_delay(refresh_delay),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server, logged_in());
    let started = Instant::now();

    let results = join_all((0..5).map(|_| {
        let client = client.clone();
        async move { client.events().await }
    }))
    .await;

    assert!(started.elapsed() >= refresh_delay);
    for result in results {
        assert_eq!(result.unwrap(), json!([{"id": 1}]));
    }
    assert_eq!(refresh_calls(&server).await, 1);

    // Refresh response carried no new refresh token; the old one stays.
    let stored = store.load().await.unwrap();
    assert_eq!(stored.refresh_token, Some(RefreshToken::new("R1")));
}

#[tokio::test]
async fn test_retry_happens_only_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/delegate/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Still no"})))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T2"})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server, logged_in());
    let err = client.profile().await.unwrap_err();

    let err = gateway_error(&err);
    assert_eq!(err.kind(), ErrorKind::AuthExpired);
    assert_eq!(err.message(), "Still no");
    // The refresh itself succeeded, so the new token is kept.
    assert_eq!(
        store.load().await.unwrap().access_token,
        Some(AccessToken::new("T2"))
    );
}

#[tokio::test]
async fn test_failed_refresh_clears_credentials_for_all_waiters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/delegate/attendees"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "Forbidden"})))
        .expect(3)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"message": "Refresh token expired"}))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server, logged_in());
    let results = join_all((0..3).map(|_| {
        let client = client.clone();
        async move { client.attendees(None).await }
    }))
    .await;

    for result in results {
        let err = result.unwrap_err();
        let err = gateway_error(&err);
        // Callers see their own original error, not the refresh failure.
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.message(), "Forbidden");
    }
    assert!(store.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_refresh_without_token_in_body_is_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/delegate/events"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server, logged_in());
    let err = client.events().await.unwrap_err();

    assert_eq!(gateway_error(&err).status(), Some(401));
    assert!(store.load().await.unwrap().is_empty());
}

/// Memory store whose token update always fails, counting clears.
struct ReadOnlyTokenStore {
    inner: MemoryCredentialStore,
    clears: AtomicUsize,
}

#[async_trait]
impl CredentialStore for ReadOnlyTokenStore {
    async fn load(&self) -> Result<Credentials, StoreError> {
        self.inner.load().await
    }

    async fn save(&self, credentials: &Credentials) -> Result<(), StoreError> {
        self.inner.save(credentials).await
    }

    async fn update_tokens(
        &self,
        _access_token: AccessToken,
        _refresh_token: Option<RefreshToken>,
    ) -> Result<(), StoreError> {
        Err(StoreError::Other {
            message: "disk full".to_string(),
        })
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear().await
    }
}

#[tokio::test]
async fn test_store_write_failure_during_refresh_clears_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/delegate/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T2"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(ReadOnlyTokenStore {
        inner: MemoryCredentialStore::with_credentials(logged_in()),
        clears: AtomicUsize::new(0),
    });
    let config = ClientConfig::new(ApiUrl::new(server.uri()).unwrap());
    let client = ConferClient::new(config, store.clone()).unwrap();

    let err = client.profile().await.unwrap_err();

    let gateway = gateway_error(&err);
    assert_eq!(gateway.status(), Some(401));
    assert_eq!(gateway.message(), "expired");
    assert_eq!(store.clears.load(Ordering::SeqCst), 1);
    assert!(store.load().await.unwrap().is_empty());
    assert!(!client.coordinator().is_refreshing());
}

#[tokio::test]
async fn test_refresh_timeout_is_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/delegate/events"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": "T2"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_credentials(logged_in()));
    let config = ClientConfig::new(ApiUrl::new(server.uri()).unwrap())
        .with_timeout(Duration::from_millis(200));
    let client = ConferClient::new(config, store.clone()).unwrap();

    let err = client.events().await.unwrap_err();

    assert_eq!(gateway_error(&err).status(), Some(401));
    assert!(store.load().await.unwrap().is_empty());
    assert!(!client.coordinator().is_refreshing());
}

#[tokio::test]
async fn test_no_token_gets_one_refresh_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/delegate/events"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthenticated."})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server, Credentials::default());
    let err = client.events().await.unwrap_err();

    assert_eq!(gateway_error(&err).message(), "Unauthenticated.");
    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("authorization"));
    assert!(store.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sequential_expiries_start_new_episodes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/delegate/events"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/delegate/events"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T2"})))
        .expect(2)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server, logged_in());
    client.events().await.unwrap();

    // Simulate the new token expiring as well.
    store
        .update_tokens(AccessToken::new("T1"), None)
        .await
        .unwrap();
    client.events().await.unwrap();

    assert_eq!(refresh_calls(&server).await, 2);
}

#[tokio::test]
async fn test_manual_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .and(body_json(json!({"refresh_token": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"access_token": "T9", "refresh_token": "R9"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server, logged_in());
    client.refresh().await.unwrap();

    let stored = store.load().await.unwrap();
    assert_eq!(stored.access_token, Some(AccessToken::new("T9")));
    assert_eq!(stored.refresh_token, Some(RefreshToken::new("R9")));
}
