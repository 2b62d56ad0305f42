use chrono::Utc;
use pathmatch_api::{
    AppConfig, AppState, MockAuthProvider, MockMailer, MockRepository, create_router,
    models::{Application, ApplicationStatus, Employer, Job, Profile, Role},
};
use reqwest::StatusCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub repo: Arc<MockRepository>,
}

/// Boots the full router on an ephemeral port against injected mocks. The
/// config stays in Local mode so identities can be supplied via the x-user-id
/// bypass header instead of minting tokens per test.
async fn spawn_app() -> TestApp {
    let repo = Arc::new(MockRepository::new());
    let config = AppConfig::default();

    let state = AppState {
        repo: repo.clone(),
        auth: Arc::new(MockAuthProvider::new(config.jwt_secret.clone())),
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

    TestApp { address, repo }
}

/// Seeds a profile and returns the subject id used for the bypass header.
fn seed_identity(repo: &MockRepository, role: Role) -> (Uuid, Uuid) {
    let subject = Uuid::new_v4();
    let profile_id = Uuid::new_v4();
    repo.seed_profile(Profile {
        id: profile_id,
        user_id: subject,
        role,
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        created_at: Utc::now(),
    });
    (subject, profile_id)
}

fn job_payload() -> serde_json::Value {
    serde_json::json!({
        "title": "Backend Engineer",
        "company": "PATHMATCH",
        "description": "Build the job board API",
        "location": "Limerick",
        "job_type": "full-time"
    })
}

// --- Tests ---

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/health", app.address))
        .send()
        .await
        .expect("req fail");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["message"], "Server is running");
}

#[tokio::test]
async fn test_job_browsing_is_public() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // No credentials of any kind.
    let response = client
        .get(format!("{}/api/jobs", app.address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_job_rejects_anonymous() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/jobs", app.address))
        .json(&job_payload())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "No token provided");
    // The gate fired before the handler: nothing was persisted.
    assert!(app.repo.jobs().is_empty());
}

#[tokio::test]
async fn test_create_job_rejects_job_seeker() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let (subject, _) = seed_identity(&app.repo, Role::JobSeeker);

    let response = client
        .post(format!("{}/api/jobs", app.address))
        .header("x-user-id", subject.to_string())
        .json(&job_payload())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Insufficient permissions");
    assert!(app.repo.jobs().is_empty());
}

#[tokio::test]
async fn test_create_job_as_employer() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let (subject, profile_id) = seed_identity(&app.repo, Role::Employer);

    let response = client
        .post(format!("{}/api/jobs", app.address))
        .header("x-user-id", subject.to_string())
        .json(&job_payload())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Job created successfully");

    // Exactly one job, owned by the session identity.
    let jobs = app.repo.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].employer_id, profile_id);
    assert_eq!(jobs[0].status, "active");
}

#[tokio::test]
async fn test_submit_application_rejects_employer() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let (subject, _) = seed_identity(&app.repo, Role::Employer);

    let response = client
        .post(format!("{}/api/applications", app.address))
        .header("x-user-id", subject.to_string())
        .json(&serde_json::json!({
            "job_id": Uuid::new_v4(),
            "cover_letter": "I would like to apply."
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.repo.applications().is_empty());
}

#[tokio::test]
async fn test_job_seeker_routes_reject_other_profiles() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let (subject, _) = seed_identity(&app.repo, Role::JobSeeker);
    let someone_else = Uuid::new_v4();

    let response = client
        .get(format!("{}/api/job-seekers/{}", app.address, someone_else))
        .header("x-user-id", subject.to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "You can only access your own profile");
}

#[tokio::test]
async fn test_employer_nested_route_specificity() {
    // The applications listing under a job must be matched by its own route,
    // not swallowed by the shorter profile route.
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let (subject, employer_id) = seed_identity(&app.repo, Role::Employer);

    app.repo.seed_employer(Employer {
        id: employer_id,
        company_name: Some("PATHMATCH".to_string()),
        updated_at: Utc::now(),
        ..Employer::default()
    });

    let job_id = Uuid::new_v4();
    app.repo.seed_job(Job {
        id: job_id,
        employer_id,
        title: "Backend Engineer".to_string(),
        status: "active".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        ..Job::default()
    });
    app.repo.seed_application(Application {
        id: Uuid::new_v4(),
        job_id,
        job_seeker_id: Uuid::new_v4(),
        cover_letter: "Hello".to_string(),
        status: ApplicationStatus::Submitted,
        submitted_at: Utc::now(),
        updated_at: Utc::now(),
    });

    let response = client
        .get(format!(
            "{}/api/employers/{}/jobs/{}/applications",
            app.address, employer_id, job_id
        ))
        .header("x-user-id", subject.to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["applications"].as_array().unwrap().len(), 1);

    // The bare profile route still resolves to the profile envelope.
    let response = client
        .get(format!("{}/api/employers/{}", app.address, employer_id))
        .header("x-user-id", subject.to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["employer"]["company_name"], "PATHMATCH");
}

#[tokio::test]
async fn test_job_applications_require_matching_employer() {
    // A job owned by a different employer is invisible through this route.
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let (subject, employer_id) = seed_identity(&app.repo, Role::Employer);

    let job_id = Uuid::new_v4();
    app.repo.seed_job(Job {
        id: job_id,
        employer_id: Uuid::new_v4(),
        title: "Someone else's posting".to_string(),
        status: "active".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        ..Job::default()
    });

    let response = client
        .get(format!(
            "{}/api/employers/{}/jobs/{}/applications",
            app.address, employer_id, job_id
        ))
        .header("x-user-id", subject.to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Job not found");
}
