use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    identity::AuthProviderError,
    mailer::ResumeAttachment,
    models::{
        ApplicationResponse, ApplicationStatus, ApplicationsResponse, CreateJobRequest,
        CurrentUserResponse, EmployerResponse, HealthResponse, JobResponse, JobSeekerResponse,
        JobsResponse, LoginRequest, NewJob, PublicApplicationResponse, PublicApplicationSummary,
        RefreshRequest, RefreshResponse, RegisterRequest, RegisterResponse, Role, SessionResponse,
        SubmitApplicationRequest, UpdateApplicationStatusRequest, UpdateEmployerRequest,
        UpdateJobSeekerRequest,
    },
};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

// Resume constraints on the public application endpoint.
const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;
const ALLOWED_RESUME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

// --- Validation Helpers ---

/// Presence check shared by the manual validators: a field counts as provided
/// only if it is present and non-blank.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Minimal syntactic email check, equivalent to the original boundary
/// validation: one '@', non-empty local part, dotted domain, no whitespace.
fn is_valid_email(address: &str) -> bool {
    if address.contains(char::is_whitespace) {
        return false;
    }
    let mut parts = address.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

/// Translates an identity-provider failure into the client-facing taxonomy.
/// `rejected` supplies the variant for provider-side refusals; outages always
/// become a generic upstream error so provider internals never leak.
fn provider_error(e: AuthProviderError, rejected: fn(String) -> ApiError) -> ApiError {
    match e {
        AuthProviderError::Rejected(msg) => rejected(msg),
        AuthProviderError::Unavailable(detail) => {
            tracing::error!("identity provider call failed: {detail}");
            ApiError::upstream("Authentication service unavailable")
        }
    }
}

// --- Auth Handlers ---

/// register
///
/// [Public Route] Creates a provider account, then mirrors it into the local
/// `profiles` table (primary-key synchronization with the provider subject)
/// and the role-specific extension table. Validation runs before any external
/// call.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = RegisterResponse),
        (status = 400, description = "Missing or invalid fields")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    const REQUIRED: &str = "Email, password, first name, last name, and role are required";

    let email = non_empty(payload.email).ok_or_else(|| ApiError::validation(REQUIRED))?;
    let password = non_empty(payload.password).ok_or_else(|| ApiError::validation(REQUIRED))?;
    let first_name = non_empty(payload.first_name).ok_or_else(|| ApiError::validation(REQUIRED))?;
    let last_name = non_empty(payload.last_name).ok_or_else(|| ApiError::validation(REQUIRED))?;
    let role = non_empty(payload.role).ok_or_else(|| ApiError::validation(REQUIRED))?;
    // Role values are a closed set; anything else never reaches the provider.
    let role = Role::try_from(role).map_err(|_| ApiError::validation("Invalid role"))?;

    if !is_valid_email(&email) {
        return Err(ApiError::validation("Invalid email format"));
    }

    let account = state
        .auth
        .sign_up(&email, &password)
        .await
        .map_err(|e| provider_error(e, ApiError::Validation))?;

    let profile = state
        .repo
        .create_profile(account.id, role, first_name, last_name)
        .await
        .ok_or_else(|| ApiError::upstream("Failed to create user profile"))?;

    // The extension row is best-effort at registration time; the profile
    // endpoints can re-create it later.
    if !state.repo.ensure_role_record(profile.id, role).await {
        tracing::warn!("failed to create {role} record for profile {}", profile.id);
    }

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user: profile,
        }),
    ))
}

/// login
///
/// [Public Route] Exchanges credentials for a provider session and resolves
/// the application profile in the same round trip so the SPA can route by
/// role immediately.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session", body = SessionResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    const REQUIRED: &str = "Email and password are required";

    let email = non_empty(payload.email).ok_or_else(|| ApiError::validation(REQUIRED))?;
    let password = non_empty(payload.password).ok_or_else(|| ApiError::validation(REQUIRED))?;

    let session = state
        .auth
        .sign_in(&email, &password)
        .await
        .map_err(|e| provider_error(e, ApiError::Unauthenticated))?;

    let profile = state
        .repo
        .get_profile_by_subject(session.user.id)
        .await
        .ok_or_else(|| ApiError::unauthenticated("User profile not found"))?;

    Ok(Json(SessionResponse {
        message: "Login successful".to_string(),
        access_token: session.access_token,
        refresh_token: session.refresh_token,
        user: profile,
    }))
}

/// refresh_token
///
/// [Public Route] Rotates a provider session. The refresh token itself is the
/// credential here; no Authorization header is involved.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Rotated session", body = RefreshResponse),
        (status = 401, description = "Invalid refresh token")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let token = non_empty(payload.refresh_token)
        .ok_or_else(|| ApiError::validation("Refresh token is required"))?;

    let session = state
        .auth
        .refresh(&token)
        .await
        .map_err(|e| provider_error(e, ApiError::Unauthenticated))?;

    Ok(Json(RefreshResponse {
        message: "Token refreshed successfully".to_string(),
        access_token: session.access_token,
        refresh_token: session.refresh_token,
    }))
}

/// get_me
///
/// [Authenticated Route, any role] Returns the authenticated user's profile.
/// The identity is resolved by the `AuthUser` extractor; this handler only
/// re-reads the full profile record.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Profile", body = CurrentUserResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let profile = state
        .repo
        .get_profile(id)
        .await
        .ok_or_else(|| ApiError::not_found("User profile not found"))?;

    Ok(Json(CurrentUserResponse {
        message: "User retrieved successfully".to_string(),
        user: profile,
    }))
}

// --- Job Handlers ---

/// get_jobs
///
/// [Public Route] Lists all active job postings.
#[utoipa::path(
    get,
    path = "/api/jobs",
    responses((status = 200, description = "Jobs", body = JobsResponse))
)]
pub async fn get_jobs(State(state): State<AppState>) -> Json<JobsResponse> {
    let jobs = state.repo.get_jobs().await;
    Json(JobsResponse {
        message: "Jobs retrieved successfully".to_string(),
        jobs,
    })
}

/// get_job_details
///
/// [Public Route] Retrieves a single job posting by ID.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job", body = JobResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_job_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobResponse>, ApiError> {
    let job = state
        .repo
        .get_job(id)
        .await
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    Ok(Json(JobResponse {
        message: "Job retrieved successfully".to_string(),
        job,
    }))
}

/// create_job
///
/// [Employer/Admin Route] Creates a job posting owned by the authenticated
/// employer. The role gate in front of this route guarantees the role; the
/// `employer_id` comes from the session, never the body.
#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Created", body = JobResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Wrong role")
    )
)]
pub async fn create_job(
    AuthUser { id: employer_id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobResponse>), ApiError> {
    const REQUIRED: &str = "Title, company, description, location, and job type are required";

    let new_job = NewJob {
        title: non_empty(payload.title).ok_or_else(|| ApiError::validation(REQUIRED))?,
        company: non_empty(payload.company).ok_or_else(|| ApiError::validation(REQUIRED))?,
        description: non_empty(payload.description)
            .ok_or_else(|| ApiError::validation(REQUIRED))?,
        location: non_empty(payload.location).ok_or_else(|| ApiError::validation(REQUIRED))?,
        job_type: non_empty(payload.job_type).ok_or_else(|| ApiError::validation(REQUIRED))?,
        salary_range: payload.salary_range,
        required_skills: payload.required_skills.unwrap_or_default(),
        benefits: payload.benefits.unwrap_or_default(),
    };

    let job = state
        .repo
        .create_job(new_job, employer_id)
        .await
        .ok_or_else(|| ApiError::upstream("Failed to save job"))?;

    Ok((
        StatusCode::CREATED,
        Json(JobResponse {
            message: "Job created successfully".to_string(),
            job,
        }),
    ))
}

// --- Application Handlers ---

/// submit_public_application
///
/// [Public Route] Accepts an anonymous application as multipart form data with
/// an optional resume file (PDF/DOC/DOCX, at most 5 MB). Nothing is persisted:
/// the submission fans out to the applicant auto-responder and the team
/// notification, and both sends are best-effort — a mail failure is logged
/// and the request still succeeds.
#[utoipa::path(
    post,
    path = "/api/applications/public",
    responses(
        (status = 201, description = "Accepted", body = PublicApplicationResponse),
        (status = 400, description = "Missing fields or bad resume")
    )
)]
pub async fn submit_public_application(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<PublicApplicationResponse>), ApiError> {
    let mut job_title: Option<String> = None;
    let mut applicant_name: Option<String> = None;
    let mut applicant_email: Option<String> = None;
    let mut cover_letter: Option<String> = None;
    let mut phone: Option<String> = None;
    let mut resume: Option<ResumeAttachment> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::validation("Malformed form data"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_title" => {
                job_title = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| ApiError::validation("Malformed form data"))?,
                )
            }
            "applicant_name" => {
                applicant_name = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| ApiError::validation("Malformed form data"))?,
                )
            }
            "applicant_email" => {
                applicant_email = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| ApiError::validation("Malformed form data"))?,
                )
            }
            "cover_letter" => {
                cover_letter = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| ApiError::validation("Malformed form data"))?,
                )
            }
            "phone" => {
                phone = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| ApiError::validation("Malformed form data"))?,
                )
            }
            "resume" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                if !ALLOWED_RESUME_TYPES.contains(&content_type.as_str()) {
                    return Err(ApiError::validation(
                        "Only PDF, DOC, and DOCX files are allowed",
                    ));
                }
                let filename = field.file_name().unwrap_or("resume").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::validation("Resume upload failed"))?;
                if bytes.len() > MAX_RESUME_BYTES {
                    return Err(ApiError::validation("Resume must be 5MB or smaller"));
                }
                resume = Some(ResumeAttachment {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            // Unknown fields are ignored, matching lenient form handling.
            _ => {}
        }
    }

    let job_title =
        non_empty(job_title).ok_or_else(|| {
            ApiError::validation("Name, email, and job title are required")
        })?;
    let applicant_name = non_empty(applicant_name)
        .ok_or_else(|| ApiError::validation("Name, email, and job title are required"))?;
    let applicant_email = non_empty(applicant_email)
        .ok_or_else(|| ApiError::validation("Name, email, and job title are required"))?;

    if !is_valid_email(&applicant_email) {
        return Err(ApiError::validation("Invalid email format"));
    }

    // Email is an auxiliary channel: failures are logged and swallowed so the
    // applicant still gets a success response.
    if let Err(e) = state
        .mailer
        .send_applicant_confirmation(&applicant_email, &applicant_name, &job_title)
        .await
    {
        tracing::warn!("failed to send auto-responder email: {e}");
    }
    if let Err(e) = state
        .mailer
        .send_team_notification(
            &applicant_name,
            &applicant_email,
            &job_title,
            cover_letter.as_deref().unwrap_or("No cover letter provided"),
            resume.as_ref(),
        )
        .await
    {
        tracing::warn!("failed to send notification email: {e}");
    }

    let summary = PublicApplicationSummary {
        job_title,
        applicant_name,
        applicant_email,
        phone,
        cover_letter,
        resume_uploaded: resume.is_some(),
        resume_filename: resume.map(|r| r.filename),
        submitted_at: Utc::now(),
        status: Default::default(),
    };

    Ok((
        StatusCode::CREATED,
        Json(PublicApplicationResponse {
            message: "Application submitted successfully. Check your email for confirmation."
                .to_string(),
            application: summary,
        }),
    ))
}

/// submit_application
///
/// [Job Seeker Route] Persists an application against a job posting. The
/// validation (job id + cover letter) runs before any persistence or email
/// side effect; the courtesy emails only fire when the optional applicant
/// fields are all present.
#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = SubmitApplicationRequest,
    responses(
        (status = 201, description = "Submitted", body = ApplicationResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Wrong role")
    )
)]
pub async fn submit_application(
    AuthUser {
        id: job_seeker_id, ..
    }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<SubmitApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationResponse>), ApiError> {
    const REQUIRED: &str = "Job ID and cover letter are required";

    let job_id = payload.job_id.ok_or_else(|| ApiError::validation(REQUIRED))?;
    let cover_letter =
        non_empty(payload.cover_letter).ok_or_else(|| ApiError::validation(REQUIRED))?;

    let application = state
        .repo
        .insert_application(job_id, job_seeker_id, cover_letter.clone())
        .await
        .ok_or_else(|| ApiError::upstream("Failed to submit application"))?;

    if let (Some(name), Some(email), Some(title)) = (
        non_empty(payload.applicant_name),
        non_empty(payload.applicant_email),
        non_empty(payload.job_title),
    ) {
        if let Err(e) = state
            .mailer
            .send_applicant_confirmation(&email, &name, &title)
            .await
        {
            tracing::warn!("failed to send auto-responder email: {e}");
        }
        if let Err(e) = state
            .mailer
            .send_team_notification(&name, &email, &title, &cover_letter, None)
            .await
        {
            tracing::warn!("failed to send notification email: {e}");
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse {
            message: "Application submitted successfully. Check your email for confirmation."
                .to_string(),
            application,
        }),
    ))
}

/// update_application_status
///
/// [Employer/Admin Route] Moves an application through its lifecycle. Only the
/// employer that owns the targeted job may update it; admins override the
/// ownership check.
#[utoipa::path(
    put,
    path = "/api/applications/{id}/status",
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = UpdateApplicationStatusRequest,
    responses(
        (status = 200, description = "Updated", body = ApplicationResponse),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Not the owning employer"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_application_status(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(payload): Json<UpdateApplicationStatusRequest>,
) -> Result<Json<ApplicationResponse>, ApiError> {
    let status =
        non_empty(payload.status).ok_or_else(|| ApiError::validation("Status is required"))?;
    let status = ApplicationStatus::try_from(status)
        .map_err(|_| ApiError::validation("Invalid status value"))?;

    let owning_employer = state
        .repo
        .get_application_employer(application_id)
        .await
        .ok_or_else(|| ApiError::not_found("Application not found"))?;

    if role != Role::Admin && owning_employer != id {
        return Err(ApiError::forbidden(
            "You can only update applications for your own jobs",
        ));
    }

    let application = state
        .repo
        .set_application_status(application_id, status)
        .await
        .ok_or_else(|| ApiError::not_found("Application not found"))?;

    Ok(Json(ApplicationResponse {
        message: "Application status updated successfully".to_string(),
        application,
    }))
}

// --- Job Seeker Handlers ---

/// Ownership check shared by the job-seeker endpoints: the gate guarantees the
/// role, this guarantees the record belongs to the caller.
fn check_job_seeker_ownership(auth: &AuthUser, id: Uuid) -> Result<(), ApiError> {
    if auth.id != id {
        return Err(ApiError::forbidden("You can only access your own profile"));
    }
    Ok(())
}

/// get_job_seeker_profile
///
/// [Job Seeker Route] Retrieves the caller's extension record.
#[utoipa::path(
    get,
    path = "/api/job-seekers/{id}",
    params(("id" = Uuid, Path, description = "Job seeker profile ID")),
    responses(
        (status = 200, description = "Profile", body = JobSeekerResponse),
        (status = 403, description = "Not your profile"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_job_seeker_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobSeekerResponse>, ApiError> {
    check_job_seeker_ownership(&auth, id)?;

    let job_seeker = state
        .repo
        .get_job_seeker(id)
        .await
        .ok_or_else(|| ApiError::not_found("Job seeker profile not found"))?;

    Ok(Json(JobSeekerResponse {
        message: "Profile retrieved successfully".to_string(),
        job_seeker,
    }))
}

/// update_job_seeker_profile
///
/// [Job Seeker Route] Partial update of the caller's extension record.
#[utoipa::path(
    put,
    path = "/api/job-seekers/{id}",
    params(("id" = Uuid, Path, description = "Job seeker profile ID")),
    request_body = UpdateJobSeekerRequest,
    responses(
        (status = 200, description = "Updated", body = JobSeekerResponse),
        (status = 403, description = "Not your profile"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_job_seeker_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobSeekerRequest>,
) -> Result<Json<JobSeekerResponse>, ApiError> {
    check_job_seeker_ownership(&auth, id)?;

    let job_seeker = state
        .repo
        .update_job_seeker(id, payload)
        .await
        .ok_or_else(|| ApiError::not_found("Job seeker profile not found"))?;

    Ok(Json(JobSeekerResponse {
        message: "Profile updated successfully".to_string(),
        job_seeker,
    }))
}

/// get_job_seeker_applications
///
/// [Job Seeker Route] Lists the caller's submitted applications.
#[utoipa::path(
    get,
    path = "/api/job-seekers/{id}/applications",
    params(("id" = Uuid, Path, description = "Job seeker profile ID")),
    responses(
        (status = 200, description = "Applications", body = ApplicationsResponse),
        (status = 403, description = "Not your profile")
    )
)]
pub async fn get_job_seeker_applications(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationsResponse>, ApiError> {
    check_job_seeker_ownership(&auth, id)?;

    let applications = state.repo.get_applications_for_job_seeker(id).await;
    Ok(Json(ApplicationsResponse {
        message: "Applications retrieved successfully".to_string(),
        applications,
    }))
}

// --- Employer Handlers ---

/// Ownership check shared by the employer endpoints; admins may act on any
/// employer's records.
fn check_employer_ownership(auth: &AuthUser, id: Uuid) -> Result<(), ApiError> {
    if auth.role != Role::Admin && auth.id != id {
        return Err(ApiError::forbidden("You can only access your own profile"));
    }
    Ok(())
}

/// get_employer_profile
///
/// [Employer/Admin Route] Retrieves an employer extension record.
#[utoipa::path(
    get,
    path = "/api/employers/{id}",
    params(("id" = Uuid, Path, description = "Employer profile ID")),
    responses(
        (status = 200, description = "Profile", body = EmployerResponse),
        (status = 403, description = "Not your profile"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_employer_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmployerResponse>, ApiError> {
    check_employer_ownership(&auth, id)?;

    let employer = state
        .repo
        .get_employer(id)
        .await
        .ok_or_else(|| ApiError::not_found("Employer profile not found"))?;

    Ok(Json(EmployerResponse {
        message: "Profile retrieved successfully".to_string(),
        employer,
    }))
}

/// update_employer_profile
///
/// [Employer/Admin Route] Partial update of an employer extension record.
#[utoipa::path(
    put,
    path = "/api/employers/{id}",
    params(("id" = Uuid, Path, description = "Employer profile ID")),
    request_body = UpdateEmployerRequest,
    responses(
        (status = 200, description = "Updated", body = EmployerResponse),
        (status = 403, description = "Not your profile"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_employer_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmployerRequest>,
) -> Result<Json<EmployerResponse>, ApiError> {
    check_employer_ownership(&auth, id)?;

    let employer = state
        .repo
        .update_employer(id, payload)
        .await
        .ok_or_else(|| ApiError::not_found("Employer profile not found"))?;

    Ok(Json(EmployerResponse {
        message: "Profile updated successfully".to_string(),
        employer,
    }))
}

/// get_employer_jobs
///
/// [Employer/Admin Route] Lists the postings owned by an employer.
#[utoipa::path(
    get,
    path = "/api/employers/{id}/jobs",
    params(("id" = Uuid, Path, description = "Employer profile ID")),
    responses(
        (status = 200, description = "Jobs", body = JobsResponse),
        (status = 403, description = "Not your profile")
    )
)]
pub async fn get_employer_jobs(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobsResponse>, ApiError> {
    check_employer_ownership(&auth, id)?;

    let jobs = state.repo.get_jobs_for_employer(id).await;
    Ok(Json(JobsResponse {
        message: "Jobs retrieved successfully".to_string(),
        jobs,
    }))
}

/// get_job_applications
///
/// [Employer/Admin Route] Lists applications received by one of the
/// employer's postings. The job must exist and belong to the addressed
/// employer; this is the most specific route under /employers and must never
/// be shadowed by the profile route.
#[utoipa::path(
    get,
    path = "/api/employers/{id}/jobs/{job_id}/applications",
    params(
        ("id" = Uuid, Path, description = "Employer profile ID"),
        ("job_id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Applications", body = ApplicationsResponse),
        (status = 403, description = "Not your profile"),
        (status = 404, description = "Job not found")
    )
)]
pub async fn get_job_applications(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, job_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApplicationsResponse>, ApiError> {
    check_employer_ownership(&auth, id)?;

    let job = state
        .repo
        .get_job(job_id)
        .await
        .filter(|job| job.employer_id == id)
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    let applications = state.repo.get_applications_for_job(job.id).await;
    Ok(Json(ApplicationsResponse {
        message: "Applications retrieved successfully".to_string(),
        applications,
    }))
}

// --- Health ---

/// health
///
/// [Public Route] Liveness probe for monitors and load balancers; returns a
/// fixed OK payload.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "OK", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation_accepts_plain_addresses() {
        assert!(is_valid_email("jane.doe@example.com"));
        assert!(is_valid_email("a@b.co"));
    }

    #[test]
    fn email_validation_rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("no-domain@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("dot@.com"));
    }

    #[test]
    fn non_empty_treats_blank_as_missing() {
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }
}
