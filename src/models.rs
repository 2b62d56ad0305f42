use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Closed Enumerations ---

/// Role
///
/// The closed set of application roles carried by every profile. Authorization
/// decisions are made exclusively against this enum; the free-form strings the
/// database stores are parsed at the row boundary so an unknown role can never
/// reach a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    #[default]
    JobSeeker,
    Employer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::JobSeeker => "job_seeker",
            Role::Employer => "employer",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "job_seeker" => Ok(Role::JobSeeker),
            "employer" => Ok(Role::Employer),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// ApplicationStatus
///
/// Lifecycle states of a job application. Status updates from employers must
/// parse into this enum; anything else is rejected as a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ApplicationStatus {
    #[default]
    Submitted,
    Reviewed,
    Interviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Interviewed => "interviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ApplicationStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "submitted" => Ok(ApplicationStatus::Submitted),
            "reviewed" => Ok(ApplicationStatus::Reviewed),
            "interviewed" => Ok(ApplicationStatus::Interviewed),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status: {other}")),
        }
    }
}

// --- Core Application Schemas (Mapped to Database) ---

/// Profile
///
/// The application-level user record stored in `public.profiles`, distinct from
/// the identity provider's account record. `user_id` is the provider subject
/// (the `sub` claim of every access token) and carries a UNIQUE constraint so
/// profile resolution can never silently pick among duplicates.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Profile {
    pub id: Uuid,
    // FK to the provider's auth.users table; UNIQUE.
    pub user_id: Uuid,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Job
///
/// A job posting owned by an employer profile. `required_skills` and `benefits`
/// map to Postgres TEXT[] columns.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Job {
    pub id: Uuid,
    // FK to public.profiles.id (owner, role = employer).
    pub employer_id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub job_type: String,
    pub salary_range: Option<String>,
    pub required_skills: Vec<String>,
    pub benefits: Vec<String>,
    pub status: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Application
///
/// A job-seeker's application to a specific job, as stored in
/// `public.applications`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_seeker_id: Uuid,
    pub cover_letter: String,
    #[sqlx(try_from = "String")]
    pub status: ApplicationStatus,
    #[ts(type = "string")]
    pub submitted_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// JobSeeker
///
/// Role-specific extension record keyed by the profile id. Created empty at
/// registration and filled in through the profile endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct JobSeeker {
    // Same value as public.profiles.id.
    pub id: Uuid,
    pub headline: Option<String>,
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub resume_url: Option<String>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Employer
///
/// Role-specific extension record keyed by the profile id.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Employer {
    // Same value as public.profiles.id.
    pub id: Uuid,
    pub company_name: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub about: Option<String>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// RegisterRequest
///
/// Input payload for POST /api/auth/register. Every field is optional at the
/// wire level so missing input surfaces as our own 400 validation error, not
/// a deserializer rejection; presence is enforced in the handler. The password
/// is only passed through to the external identity provider and never
/// persisted or logged by this application.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    /// Parsed into `Role` at the boundary; unknown values are a 400.
    pub role: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// LoginRequest
///
/// Input payload for POST /api/auth/login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// RefreshRequest
///
/// Input payload for POST /api/auth/refresh.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// CreateJobRequest
///
/// Input payload for POST /api/jobs. The employer id is never accepted from
/// the client; it is taken from the authenticated session. Required fields are
/// validated in the handler and collapsed into a `NewJob`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateJobRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary_range: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
}

/// NewJob
///
/// A fully validated job posting, as handed to the repository. Internal only;
/// never appears on the wire.
#[derive(Debug, Clone, Default)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub job_type: String,
    pub salary_range: Option<String>,
    pub required_skills: Vec<String>,
    pub benefits: Vec<String>,
}

/// SubmitApplicationRequest
///
/// Input payload for POST /api/applications (authenticated job seekers).
/// The applicant fields are optional courtesy data used only to address the
/// confirmation emails; persistence relies solely on `job_id` and the
/// session identity.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SubmitApplicationRequest {
    pub job_id: Option<Uuid>,
    pub cover_letter: Option<String>,
    pub applicant_name: Option<String>,
    pub applicant_email: Option<String>,
    pub job_title: Option<String>,
}

/// UpdateApplicationStatusRequest
///
/// Input payload for PUT /api/applications/{id}/status. The raw string is
/// parsed into `ApplicationStatus` at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateApplicationStatusRequest {
    pub status: Option<String>,
}

/// UpdateJobSeekerRequest
///
/// Partial update payload for PUT /api/job-seekers/{id}. Uses `Option<T>` for
/// all fields so only provided fields are written (COALESCE in the repository).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateJobSeekerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
}

/// UpdateEmployerRequest
///
/// Partial update payload for PUT /api/employers/{id}.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateEmployerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
}

// --- Response Envelopes (Output Schemas) ---

/// RegisterResponse
///
/// Output of POST /api/auth/register. Tokens are deliberately absent; the
/// client logs in after registering.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterResponse {
    pub message: String,
    pub user: Profile,
}

/// SessionResponse
///
/// Output of POST /api/auth/login: a provider session plus the resolved
/// application profile.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionResponse {
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
    pub user: Profile,
}

/// RefreshResponse
///
/// Output of POST /api/auth/refresh.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RefreshResponse {
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// CurrentUserResponse
///
/// Output of GET /api/auth/me.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CurrentUserResponse {
    pub message: String,
    pub user: Profile,
}

/// JobsResponse
///
/// Output of job listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct JobsResponse {
    pub message: String,
    pub jobs: Vec<Job>,
}

/// JobResponse
///
/// Output of single-job endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct JobResponse {
    pub message: String,
    pub job: Job,
}

/// ApplicationResponse
///
/// Output of the persisted-application endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ApplicationResponse {
    pub message: String,
    pub application: Application,
}

/// ApplicationsResponse
///
/// Output of application listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ApplicationsResponse {
    pub message: String,
    pub applications: Vec<Application>,
}

/// PublicApplicationSummary
///
/// Echo of a public (unauthenticated) application submission. Nothing is
/// persisted for these; the summary is what the notification emails carry.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PublicApplicationSummary {
    pub job_title: String,
    pub applicant_name: String,
    pub applicant_email: String,
    pub phone: Option<String>,
    pub cover_letter: Option<String>,
    pub resume_uploaded: bool,
    pub resume_filename: Option<String>,
    #[ts(type = "string")]
    pub submitted_at: DateTime<Utc>,
    pub status: ApplicationStatus,
}

/// PublicApplicationResponse
///
/// Output of POST /api/applications/public.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PublicApplicationResponse {
    pub message: String,
    pub application: PublicApplicationSummary,
}

/// JobSeekerResponse
///
/// Output of the job-seeker profile endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct JobSeekerResponse {
    pub message: String,
    pub job_seeker: JobSeeker,
}

/// EmployerResponse
///
/// Output of the employer profile endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct EmployerResponse {
    pub message: String,
    pub employer: Employer,
}

/// HealthResponse
///
/// Fixed payload of the liveness probe.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}
