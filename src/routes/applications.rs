use crate::{AppState, auth, handlers};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{post, put},
};

/// Applications Router Module
///
/// Three distinct access levels share this resource: the public multipart
/// endpoint, the job-seeker submission endpoint, and the employer-only status
/// transition. Each gets its own sub-router so each gate covers exactly the
/// routes it should.
pub fn routes(state: AppState) -> Router<AppState> {
    // POST /applications/public
    // Anonymous multipart submission with an optional resume. The body limit
    // leaves headroom above the 5MB resume cap for the remaining form fields.
    let public = Router::new()
        .route("/public", post(handlers::submit_public_application))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024));

    // POST /applications
    // Persisted submission by an authenticated job seeker.
    let seeker = Router::new()
        .route("/", post(handlers::submit_application))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_job_seeker,
        ));

    // PUT /applications/{id}/status
    // Lifecycle transition, restricted to the owning employer (or an admin).
    let employer = Router::new()
        .route("/{id}/status", put(handlers::update_application_status))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::require_employer_or_admin,
        ));

    public.merge(seeker).merge(employer)
}
