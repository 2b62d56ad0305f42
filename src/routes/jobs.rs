use crate::{AppState, auth, handlers};
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Jobs Router Module
///
/// Job browsing is anonymous; posting is restricted to employers and admins.
/// The two live on the same `/jobs` path with different methods, so the gated
/// method gets its own sub-router with a `route_layer` and is merged with the
/// public routes. `route_layer` (rather than `layer`) keeps the gate off the
/// public GETs.
pub fn routes(state: AppState) -> Router<AppState> {
    let gated = Router::new()
        // POST /jobs
        // Creates a posting owned by the authenticated employer.
        .route("/", post(handlers::create_job))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::require_employer_or_admin,
        ));

    Router::new()
        // GET /jobs
        // Lists all active postings for anonymous browsing.
        .route("/", get(handlers::get_jobs))
        // GET /jobs/{id}
        // Detailed view of one posting.
        .route("/{id}", get(handlers::get_job_details))
        .merge(gated)
}
