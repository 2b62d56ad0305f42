use crate::{AppState, auth, handlers};
use axum::{
    Router, middleware,
    routing::{get, put},
};

/// Job Seekers Router Module
///
/// Every route here carries the job_seeker gate; the handlers additionally
/// enforce that the addressed profile belongs to the caller. The applications
/// listing is registered before the bare profile route so the longer path
/// always wins.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        // GET /job-seekers/{id}/applications
        // The caller's application history.
        .route("/{id}/applications", get(handlers::get_job_seeker_applications))
        // GET/PUT /job-seekers/{id}
        // The caller's extension profile (headline, skills, resume URL).
        .route(
            "/{id}",
            get(handlers::get_job_seeker_profile).put(handlers::update_job_seeker_profile),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::require_job_seeker,
        ))
}
