use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Auth Router Module
///
/// The identity gateway: account creation, credential exchange, and token
/// rotation are all public by necessity, while `/me` relies on the `AuthUser`
/// extractor inside its handler rather than a role gate (any authenticated
/// role may call it).
pub fn routes() -> Router<AppState> {
    Router::new()
        // POST /auth/register
        // Creates a provider account and mirrors it into the local profiles table.
        .route("/register", post(handlers::register))
        // POST /auth/login
        // Exchanges credentials for a provider session plus the resolved profile.
        .route("/login", post(handlers::login))
        // POST /auth/refresh
        // Rotates a provider session using the refresh token as the credential.
        .route("/refresh", post(handlers::refresh_token))
        // GET /auth/me
        // Returns the authenticated user's profile; authentication happens in
        // the handler via the AuthUser extractor.
        .route("/me", get(handlers::get_me))
}
