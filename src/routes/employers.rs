use crate::{AppState, auth, handlers};
use axum::{
    Router, middleware,
    routing::{get, put},
};

/// Employers Router Module
///
/// All routes carry the employer/admin gate; the handlers enforce ownership
/// (with an admin override). Most specific paths first: the per-job
/// applications listing must be matched ahead of the jobs listing, which in
/// turn sits ahead of the bare profile route.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        // GET /employers/{id}/jobs/{job_id}/applications
        // Applications received by one of the employer's postings.
        .route(
            "/{id}/jobs/{job_id}/applications",
            get(handlers::get_job_applications),
        )
        // GET /employers/{id}/jobs
        // Postings owned by the employer.
        .route("/{id}/jobs", get(handlers::get_employer_jobs))
        // GET/PUT /employers/{id}
        // The employer's extension profile (company, website, industry).
        .route(
            "/{id}",
            get(handlers::get_employer_profile).put(handlers::update_employer_profile),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::require_employer_or_admin,
        ))
}
