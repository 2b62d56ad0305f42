use pathmatch_api::{
    AppConfig, AppState, MockAuthProvider, MockMailer, MockRepository, create_router,
    identity::AuthProvider,
};
use reqwest::StatusCode;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct TestApp {
    pub address: String,
    pub provider: Arc<MockAuthProvider>,
}

/// Boots the router with a mock identity provider whose access tokens are real
/// HS256 JWTs signed with the configured secret, so the full register, login,
/// and bearer-token flows run end to end without any external service.
async fn spawn_app() -> TestApp {
    let config = AppConfig::default();
    let provider = Arc::new(MockAuthProvider::new(config.jwt_secret.clone()));

    let state = AppState {
        repo: Arc::new(MockRepository::new()),
        auth: provider.clone(),
        mailer: Arc::new(MockMailer::new()),
        config,
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address, provider }
}

fn register_payload() -> serde_json::Value {
    serde_json::json!({
        "email": "jane@example.com",
        "password": "correct horse battery staple",
        "first_name": "Jane",
        "last_name": "Doe",
        "role": "job_seeker"
    })
}

// --- Tests ---

#[tokio::test]
async fn test_register_requires_all_fields() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&serde_json::json!({ "email": "jane@example.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Email, password, first name, last name, and role are required"
    );
}

#[tokio::test]
async fn test_register_rejects_unknown_role() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let mut payload = register_payload();
    payload["role"] = serde_json::json!("superuser");

    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid role");
}

#[tokio::test]
async fn test_register_login_me_round_trip() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // Register.
    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&register_payload())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["role"], "job_seeker");
    // No tokens at registration time.
    assert!(body.get("access_token").is_none());

    // Login.
    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({
            "email": "jane@example.com",
            "password": "correct horse battery staple"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Login successful");
    let access_token = body["access_token"].as_str().unwrap().to_string();
    assert!(!access_token.is_empty());

    // The issued token authenticates /me.
    let response = client
        .get(format!("{}/api/auth/me", app.address))
        .bearer_auth(&access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["first_name"], "Jane");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/api/auth/register", app.address))
        .json(&register_payload())
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({
            "email": "jane@example.com",
            "password": "wrong"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid email or password");
    assert!(body.get("access_token").is_none());
}

#[tokio::test]
async fn test_login_without_profile_is_rejected() {
    // A provider account with no mirrored profile row cannot log in: there is
    // no role to authorize against.
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    app.provider
        .sign_up("orphan@example.com", "password123")
        .await
        .unwrap();

    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({
            "email": "orphan@example.com",
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User profile not found");
}

#[tokio::test]
async fn test_refresh_rotates_session() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/api/auth/register", app.address))
        .json(&register_payload())
        .send()
        .await
        .unwrap();
    let login: serde_json::Value = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({
            "email": "jane@example.com",
            "password": "correct horse battery staple"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let refresh_token = login["refresh_token"].as_str().unwrap().to_string();

    let response = client
        .post(format!("{}/api/auth/refresh", app.address))
        .json(&serde_json::json!({ "refresh_token": refresh_token }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Token refreshed successfully");
    let rotated = body["refresh_token"].as_str().unwrap();
    assert_ne!(rotated, refresh_token);
}

#[tokio::test]
async fn test_refresh_rejects_unknown_token() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/auth/refresh", app.address))
        .json(&serde_json::json!({ "refresh_token": "nonsense" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid or expired refresh token");
}
