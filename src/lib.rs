use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    routing::get,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod mailer;
pub mod models;
pub mod repository;

// Routing, segregated per resource with explicit role gates.
pub mod routes;

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use identity::{AuthProviderState, MockAuthProvider, SupabaseAuthClient};
pub use mailer::{HttpMailer, MailerState, MockMailer};
pub use repository::{MockRepository, PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the application
/// by aggregating every handler decorated with `#[utoipa::path]` and every
/// schema decorated with `#[derive(utoipa::ToSchema)]`. The resulting JSON is
/// served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register, handlers::login, handlers::refresh_token, handlers::get_me,
        handlers::get_jobs, handlers::get_job_details, handlers::create_job,
        handlers::submit_public_application, handlers::submit_application,
        handlers::update_application_status,
        handlers::get_job_seeker_profile, handlers::update_job_seeker_profile,
        handlers::get_job_seeker_applications,
        handlers::get_employer_profile, handlers::update_employer_profile,
        handlers::get_employer_jobs, handlers::get_job_applications,
        handlers::health,
    ),
    components(
        schemas(
            models::Role, models::ApplicationStatus, models::Profile, models::Job,
            models::Application, models::JobSeeker, models::Employer,
            models::RegisterRequest, models::LoginRequest, models::RefreshRequest,
            models::CreateJobRequest, models::SubmitApplicationRequest,
            models::UpdateApplicationStatusRequest, models::UpdateJobSeekerRequest,
            models::UpdateEmployerRequest,
            models::RegisterResponse, models::SessionResponse, models::RefreshResponse,
            models::CurrentUserResponse, models::JobsResponse, models::JobResponse,
            models::ApplicationResponse, models::ApplicationsResponse,
            models::PublicApplicationSummary, models::PublicApplicationResponse,
            models::JobSeekerResponse, models::EmployerResponse, models::HealthResponse,
        )
    ),
    tags(
        (name = "pathmatch", description = "PATHMATCH Job Board API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding all application
/// services and configuration, shared across every incoming request.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: Postgres access behind the `Repository` trait.
    pub repo: RepositoryState,
    /// Identity Layer: the managed auth provider behind the `AuthProvider` trait.
    pub auth: AuthProviderState,
    /// Mail Layer: outbound notification email behind the `Mailer` trait.
    pub mailer: MailerState,
    /// Configuration: The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These let extractors and handlers pull individual components out of the
// shared AppState instead of depending on the whole container.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AuthProviderState {
    fn from_ref(app_state: &AppState) -> AuthProviderState {
        app_state.auth.clone()
    }
}

impl FromRef<AppState> for MailerState {
    fn from_ref(app_state: &AppState) -> MailerState {
        app_state.mailer.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and
/// scoped middleware, and registers the application state. All API resources
/// are nested under `/api`; the role gates are applied inside the individual
/// route modules so each gate covers exactly the routes it should.
pub fn create_router(state: AppState) -> Router {
    // CORS: the API serves a separate SPA origin, so it stays permissive.
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    let api = Router::new()
        .route("/health", get(handlers::health))
        .nest("/auth", routes::auth::routes())
        .nest("/jobs", routes::jobs::routes(state.clone()))
        .nest("/applications", routes::applications::routes(state.clone()))
        .nest("/job-seekers", routes::job_seekers::routes(state.clone()))
        .nest("/employers", routes::employers::routes(state.clone()));

    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        // Apply the Unified State to all routes.
        .with_state(state);

    // Observability and Correlation Layers (applied outermost).
    base_router
        .layer(
            ServiceBuilder::new()
                // Request ID Generation: a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // Request Tracing: wraps the request/response lifecycle in a span
                // correlated by the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // Request ID Propagation: return the x-request-id header to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes span creation for `TraceLayer`: extracts the `x-request-id`
/// header (if present) and includes it alongside the HTTP method and URI so
/// every log line for a single request shares a correlation ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
