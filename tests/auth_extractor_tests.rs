use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use pathmatch_api::{
    AppState, MockAuthProvider, MockMailer, MockRepository,
    auth::{AuthUser, Claims},
    config::{AppConfig, Env},
    models::{Profile, Role},
};
use std::{sync::Arc, time::SystemTime};
use uuid::Uuid;

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "super-secure-test-secret-value-local";

fn create_token(subject: Uuid, exp_offset: i64) -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: subject,
        iat: now as usize,
        exp: (now + exp_offset) as usize,
    };

    let key = EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

fn seeded_repo(subject: Uuid, role: Role) -> Arc<MockRepository> {
    let repo = Arc::new(MockRepository::new());
    repo.seed_profile(Profile {
        id: Uuid::new_v4(),
        user_id: subject,
        role,
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        created_at: chrono::Utc::now(),
    });
    repo
}

fn create_app_state(env: Env, repo: Arc<MockRepository>) -> AppState {
    let mut config = AppConfig::default();
    config.env = env;
    config.jwt_secret = TEST_JWT_SECRET.to_string();

    AppState {
        repo,
        auth: Arc::new(MockAuthProvider::new(TEST_JWT_SECRET)),
        mailer: Arc::new(MockMailer::new()),
        config,
    }
}

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

// --- Tests ---

#[tokio::test]
async fn test_auth_success_with_valid_jwt() {
    let subject = Uuid::new_v4();
    let token = create_token(subject, 3600);
    let state = create_app_state(Env::Production, seeded_repo(subject, Role::Employer));

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await;

    assert!(auth_user.is_ok());
    let user = auth_user.unwrap();
    assert_eq!(user.role, Role::Employer);
}

#[tokio::test]
async fn test_auth_failure_with_missing_header() {
    let state = create_app_state(Env::Production, Arc::new(MockRepository::new()));

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await;

    let err = auth_user.unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(err.to_string(), "No token provided");
}

#[tokio::test]
async fn test_auth_failure_with_expired_jwt() {
    let subject = Uuid::new_v4();
    // Expired an hour ago, well outside any default leeway.
    let token = create_token(subject, -3600);
    let state = create_app_state(Env::Production, seeded_repo(subject, Role::JobSeeker));

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(err.to_string(), "Invalid or expired token");
}

#[tokio::test]
async fn test_auth_failure_with_garbage_token() {
    let state = create_app_state(Env::Production, Arc::new(MockRepository::new()));

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_static("Bearer not-a-jwt"),
    );

    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(err.to_string(), "Invalid or expired token");
}

#[tokio::test]
async fn test_auth_failure_with_valid_jwt_but_no_profile() {
    // Signed and unexpired, but the subject has no profile row (e.g. the
    // account was deleted after the token was issued).
    let token = create_token(Uuid::new_v4(), 3600);
    let state = create_app_state(Env::Production, Arc::new(MockRepository::new()));

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(err.to_string(), "User profile not found");
}

#[tokio::test]
async fn test_local_bypass_success() {
    let subject = Uuid::new_v4();
    let state = create_app_state(Env::Local, seeded_repo(subject, Role::Admin));

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&subject.to_string()).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await;

    assert!(auth_user.is_ok());
    assert_eq!(auth_user.unwrap().role, Role::Admin);
}

#[tokio::test]
async fn test_local_bypass_disabled_in_prod() {
    let subject = Uuid::new_v4();
    // Even with a matching profile seeded, production ignores the header.
    let state = create_app_state(Env::Production, seeded_repo(subject, Role::Admin));

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&subject.to_string()).unwrap(),
    );

    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}
