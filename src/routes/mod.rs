/// Router Module Index
///
/// Organizes the application's routing logic into resource-oriented modules.
/// Access control is applied explicitly per route group (via Axum layers), so
/// a reader can see from the router alone which endpoints are public, which
/// require a session, and which require a specific role.
///
/// Registration order matters within a resource: the most specific paths are
/// registered first so that, e.g., `/employers/{id}/jobs/{job_id}/applications`
/// is never shadowed by `/employers/{id}`.

/// Registration, login, token refresh, and the current-user endpoint.
pub mod auth;

/// Public job browsing plus employer-gated posting.
pub mod jobs;

/// Application submission (public and job-seeker), plus the employer-gated
/// status transition.
pub mod applications;

/// Job-seeker profile and application history, gated to the job_seeker role.
pub mod job_seekers;

/// Employer profile, postings, and received applications, gated to the
/// employer and admin roles.
pub mod employers;
