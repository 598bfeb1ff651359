#![allow(clippy::unwrap_used)]
// Session lifecycle integration tests: login/logout flows, persisted
// rehydration, the logout-beats-login generation guard, and the forced
// logout driven by an irrecoverable refresh failure.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use opsdeck_core::api::session::{
    MemorySessionStore, SessionSnapshot, TokenPair, UserProfile,
};
use opsdeck_core::{
    BackofficeClient, CoreError, SessionHandle, SessionManager, SessionState,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn profile_json() -> serde_json::Value {
    json!({
        "id": 1,
        "email": "admin@example.com",
        "firstName": "Admin",
        "lastName": "User",
        "role": "admin"
    })
}

fn auth_body() -> serde_json::Value {
    json!({
        "token": "access-1",
        "refreshToken": "refresh-1",
        "user": profile_json()
    })
}

async fn setup_with(session: SessionHandle) -> (MockServer, Arc<SessionManager>, SessionHandle) {
    let server = MockServer::start().await;
    let client = Arc::new(
        BackofficeClient::from_reqwest(&server.uri(), reqwest::Client::new(), session.clone())
            .unwrap(),
    );
    (server, Arc::new(SessionManager::new(client)), session)
}

async fn setup() -> (MockServer, Arc<SessionManager>, SessionHandle) {
    setup_with(SessionHandle::in_memory()).await
}

fn password() -> secrecy::SecretString {
    "correct-horse".to_string().into()
}

// ── Login / logout ──────────────────────────────────────────────────

#[tokio::test]
async fn login_persists_session_and_transitions_to_logged_in() {
    let (server, manager, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body()))
        .mount(&server)
        .await;

    let user = manager.login("admin@example.com", &password()).await.unwrap();

    assert_eq!(user.email, "admin@example.com");
    assert!(manager.state().is_logged_in());
    assert_eq!(session.access_token().as_deref(), Some("access-1"));
    assert_eq!(session.refresh_token().as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn failed_login_returns_to_logged_out_with_error() {
    let (server, manager, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid username or password"
        })))
        .mount(&server)
        .await;

    let result = manager.login("admin@example.com", &password()).await;

    assert!(matches!(result, Err(CoreError::Auth { .. })));
    assert_eq!(manager.state(), SessionState::LoggedOut);
    assert!(manager.last_error().unwrap().contains("Invalid username or password"));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn logout_clears_persisted_session() {
    let (server, manager, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body()))
        .mount(&server)
        .await;

    manager.login("admin@example.com", &password()).await.unwrap();
    manager.logout().unwrap();

    assert_eq!(manager.state(), SessionState::LoggedOut);
    assert!(!session.is_authenticated());

    // Idempotent under repeat invocation.
    manager.logout().unwrap();
    assert_eq!(manager.state(), SessionState::LoggedOut);
}

#[tokio::test]
async fn logout_during_in_flight_login_wins() {
    let (server, manager, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(auth_body())
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    let login_task = {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move { manager.login("admin@example.com", &password()).await })
    };

    // Let the login request get onto the wire, then log out underneath it.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(manager.state(), SessionState::Authenticating);
    manager.logout().unwrap();

    let login_result = login_task.await.unwrap();

    // The late-resolving login must not resurrect the cleared session.
    assert!(login_result.is_err());
    assert_eq!(manager.state(), SessionState::LoggedOut);
    assert!(!session.is_authenticated());
}

// ── Rehydration ─────────────────────────────────────────────────────

#[tokio::test]
async fn bootstrap_rehydrates_persisted_session_without_network() {
    let snapshot = SessionSnapshot {
        user: UserProfile {
            id: 1,
            email: "admin@example.com".into(),
            first_name: "Admin".into(),
            last_name: "User".into(),
            role: "admin".into(),
        },
        tokens: TokenPair {
            access: "persisted-access".into(),
            refresh: "persisted-refresh".into(),
        },
    };
    let session = SessionHandle::new(Box::new(MemorySessionStore::with_snapshot(snapshot)));
    let (_server, manager, session) = setup_with(session).await;

    let user = manager.bootstrap().unwrap();

    assert_eq!(user.unwrap().email, "admin@example.com");
    assert!(manager.state().is_logged_in());
    assert_eq!(session.access_token().as_deref(), Some("persisted-access"));
}

#[tokio::test]
async fn bootstrap_without_persisted_session_stays_logged_out() {
    let (_server, manager, _session) = setup().await;

    let user = manager.bootstrap().unwrap();

    assert!(user.is_none());
    assert_eq!(manager.state(), SessionState::LoggedOut);
}

// ── Forced logout ───────────────────────────────────────────────────

#[tokio::test]
async fn irrecoverable_refresh_failure_forces_logout() {
    let (server, manager, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/inventory/items"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    manager.login("admin@example.com", &password()).await.unwrap();
    let _listener = manager.spawn_expiry_listener();
    let mut state_rx = manager.watch_state();

    // Any data call now hits the 401 -> failed refresh -> expiry path.
    let client = Arc::new(
        BackofficeClient::from_reqwest(&server.uri(), reqwest::Client::new(), session.clone())
            .unwrap(),
    );
    let stores = opsdeck_core::Stores::new(client);
    let result = stores.inventory.refresh().await;
    assert!(matches!(result, Err(CoreError::Auth { .. })));

    // The listener applies the distinguishable session-expired state.
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if *state_rx.borrow() == SessionState::RefreshFailed {
                break;
            }
            state_rx.changed().await.unwrap();
        }
    })
    .await
    .expect("expected transition to RefreshFailed");

    assert!(!session.is_authenticated());
    assert!(manager.last_error().unwrap().contains("expired"));
}

#[tokio::test]
async fn login_recovers_from_refresh_failed_state() {
    let (server, manager, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body()))
        .mount(&server)
        .await;

    // Simulate an expired session having been cleared by the client.
    session.expire();
    let _listener = manager.spawn_expiry_listener();

    manager.login("admin@example.com", &password()).await.unwrap();

    assert!(manager.state().is_logged_in());
    assert!(session.is_authenticated());
}
