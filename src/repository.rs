use crate::models::{
    Application, ApplicationStatus, Employer, Job, JobSeeker, NewJob, Profile, Role,
    UpdateEmployerRequest, UpdateJobSeekerRequest,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. This is the core
/// of the Repository Abstraction pattern, allowing the handlers to interact with
/// the data layer without knowing the specific implementation (Postgres, Mock).
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's async task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Profiles ---
    /// Resolves the role-bearing profile for a provider subject (the `sub`
    /// claim). `profiles.user_id` is UNIQUE, so at most one row can match.
    async fn get_profile_by_subject(&self, subject: Uuid) -> Option<Profile>;
    async fn get_profile(&self, id: Uuid) -> Option<Profile>;
    /// Creates the mirroring profile record after external signup success.
    async fn create_profile(
        &self,
        subject: Uuid,
        role: Role,
        first_name: String,
        last_name: String,
    ) -> Option<Profile>;
    /// Inserts the role-specific extension row (job_seekers / employers).
    /// Idempotent; a no-op for admins.
    async fn ensure_role_record(&self, profile_id: Uuid, role: Role) -> bool;

    // --- Jobs ---
    async fn get_jobs(&self) -> Vec<Job>;
    async fn get_job(&self, id: Uuid) -> Option<Job>;
    async fn create_job(&self, job: NewJob, employer_id: Uuid) -> Option<Job>;
    async fn get_jobs_for_employer(&self, employer_id: Uuid) -> Vec<Job>;

    // --- Applications ---
    async fn insert_application(
        &self,
        job_id: Uuid,
        job_seeker_id: Uuid,
        cover_letter: String,
    ) -> Option<Application>;
    async fn get_application(&self, id: Uuid) -> Option<Application>;
    /// Resolves the employer that owns the job an application targets.
    /// Used for the ownership check on status updates.
    async fn get_application_employer(&self, id: Uuid) -> Option<Uuid>;
    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Option<Application>;
    async fn get_applications_for_job_seeker(&self, job_seeker_id: Uuid) -> Vec<Application>;
    async fn get_applications_for_job(&self, job_id: Uuid) -> Vec<Application>;

    // --- Role-specific profiles ---
    async fn get_job_seeker(&self, id: Uuid) -> Option<JobSeeker>;
    /// Partial update; only provided fields are written (COALESCE).
    async fn update_job_seeker(&self, id: Uuid, req: UpdateJobSeekerRequest) -> Option<JobSeeker>;
    async fn get_employer(&self, id: Uuid) -> Option<Employer>;
    async fn update_employer(&self, id: Uuid, req: UpdateEmployerRequest) -> Option<Employer>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

const PROFILE_COLS: &str = "id, user_id, role, first_name, last_name, created_at";
const JOB_COLS: &str = "id, employer_id, title, company, description, location, job_type, \
                        salary_range, required_skills, benefits, status, created_at, updated_at";
const APPLICATION_COLS: &str =
    "id, job_id, job_seeker_id, cover_letter, status, submitted_at, updated_at";

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
/// Queries are runtime-checked (`sqlx::query_as` with binds) so the crate builds
/// without a live database; the schema lives in db/schema.sql.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_profile_by_subject(&self, subject: Uuid) -> Option<Profile> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLS} FROM profiles WHERE user_id = $1"
        ))
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_profile_by_subject error: {:?}", e);
            None
        })
    }

    async fn get_profile(&self, id: Uuid) -> Option<Profile> {
        sqlx::query_as::<_, Profile>(&format!("SELECT {PROFILE_COLS} FROM profiles WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_profile error: {:?}", e);
                None
            })
    }

    async fn create_profile(
        &self,
        subject: Uuid,
        role: Role,
        first_name: String,
        last_name: String,
    ) -> Option<Profile> {
        sqlx::query_as::<_, Profile>(&format!(
            "INSERT INTO profiles (id, user_id, role, first_name, last_name, created_at) \
             VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING {PROFILE_COLS}"
        ))
        .bind(Uuid::new_v4())
        .bind(subject)
        .bind(role.as_str())
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_profile error: {:?}", e);
            None
        })
    }

    async fn ensure_role_record(&self, profile_id: Uuid, role: Role) -> bool {
        let query = match role {
            Role::JobSeeker => {
                "INSERT INTO job_seekers (id, updated_at) VALUES ($1, NOW()) ON CONFLICT DO NOTHING"
            }
            Role::Employer => {
                "INSERT INTO employers (id, updated_at) VALUES ($1, NOW()) ON CONFLICT DO NOTHING"
            }
            // Admins carry no extension record.
            Role::Admin => return true,
        };
        match sqlx::query(query).bind(profile_id).execute(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("ensure_role_record error: {:?}", e);
                false
            }
        }
    }

    async fn get_jobs(&self) -> Vec<Job> {
        sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLS} FROM jobs WHERE status = 'active' ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_jobs error: {:?}", e);
            vec![]
        })
    }

    async fn get_job(&self, id: Uuid) -> Option<Job> {
        sqlx::query_as::<_, Job>(&format!("SELECT {JOB_COLS} FROM jobs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_job error: {:?}", e);
                None
            })
    }

    async fn create_job(&self, job: NewJob, employer_id: Uuid) -> Option<Job> {
        sqlx::query_as::<_, Job>(&format!(
            "INSERT INTO jobs (id, employer_id, title, company, description, location, \
             job_type, salary_range, required_skills, benefits, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'active', NOW(), NOW()) \
             RETURNING {JOB_COLS}"
        ))
        .bind(Uuid::new_v4())
        .bind(employer_id)
        .bind(job.title)
        .bind(job.company)
        .bind(job.description)
        .bind(job.location)
        .bind(job.job_type)
        .bind(job.salary_range)
        .bind(job.required_skills)
        .bind(job.benefits)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_job error: {:?}", e);
            None
        })
    }

    async fn get_jobs_for_employer(&self, employer_id: Uuid) -> Vec<Job> {
        sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLS} FROM jobs WHERE employer_id = $1 ORDER BY created_at DESC"
        ))
        .bind(employer_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_jobs_for_employer error: {:?}", e);
            vec![]
        })
    }

    async fn insert_application(
        &self,
        job_id: Uuid,
        job_seeker_id: Uuid,
        cover_letter: String,
    ) -> Option<Application> {
        sqlx::query_as::<_, Application>(&format!(
            "INSERT INTO applications (id, job_id, job_seeker_id, cover_letter, status, \
             submitted_at, updated_at) VALUES ($1, $2, $3, $4, 'submitted', NOW(), NOW()) \
             RETURNING {APPLICATION_COLS}"
        ))
        .bind(Uuid::new_v4())
        .bind(job_id)
        .bind(job_seeker_id)
        .bind(cover_letter)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("insert_application error: {:?}", e);
            None
        })
    }

    async fn get_application(&self, id: Uuid) -> Option<Application> {
        sqlx::query_as::<_, Application>(&format!(
            "SELECT {APPLICATION_COLS} FROM applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_application error: {:?}", e);
            None
        })
    }

    async fn get_application_employer(&self, id: Uuid) -> Option<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT j.employer_id FROM applications a JOIN jobs j ON a.job_id = j.id \
             WHERE a.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_application_employer error: {:?}", e);
            None
        })
    }

    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Option<Application> {
        sqlx::query_as::<_, Application>(&format!(
            "UPDATE applications SET status = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {APPLICATION_COLS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("set_application_status error: {:?}", e);
            None
        })
    }

    async fn get_applications_for_job_seeker(&self, job_seeker_id: Uuid) -> Vec<Application> {
        sqlx::query_as::<_, Application>(&format!(
            "SELECT {APPLICATION_COLS} FROM applications WHERE job_seeker_id = $1 \
             ORDER BY submitted_at DESC"
        ))
        .bind(job_seeker_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_applications_for_job_seeker error: {:?}", e);
            vec![]
        })
    }

    async fn get_applications_for_job(&self, job_id: Uuid) -> Vec<Application> {
        sqlx::query_as::<_, Application>(&format!(
            "SELECT {APPLICATION_COLS} FROM applications WHERE job_id = $1 \
             ORDER BY submitted_at DESC"
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_applications_for_job error: {:?}", e);
            vec![]
        })
    }

    async fn get_job_seeker(&self, id: Uuid) -> Option<JobSeeker> {
        sqlx::query_as::<_, JobSeeker>(
            "SELECT id, headline, skills, location, resume_url, updated_at \
             FROM job_seekers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_job_seeker error: {:?}", e);
            None
        })
    }

    async fn update_job_seeker(&self, id: Uuid, req: UpdateJobSeekerRequest) -> Option<JobSeeker> {
        sqlx::query_as::<_, JobSeeker>(
            "UPDATE job_seekers \
             SET headline = COALESCE($2, headline), \
                 skills = COALESCE($3, skills), \
                 location = COALESCE($4, location), \
                 resume_url = COALESCE($5, resume_url), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, headline, skills, location, resume_url, updated_at",
        )
        .bind(id)
        .bind(req.headline)
        .bind(req.skills)
        .bind(req.location)
        .bind(req.resume_url)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_job_seeker error: {:?}", e);
            None
        })
    }

    async fn get_employer(&self, id: Uuid) -> Option<Employer> {
        sqlx::query_as::<_, Employer>(
            "SELECT id, company_name, website, industry, about, updated_at \
             FROM employers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_employer error: {:?}", e);
            None
        })
    }

    async fn update_employer(&self, id: Uuid, req: UpdateEmployerRequest) -> Option<Employer> {
        sqlx::query_as::<_, Employer>(
            "UPDATE employers \
             SET company_name = COALESCE($2, company_name), \
                 website = COALESCE($3, website), \
                 industry = COALESCE($4, industry), \
                 about = COALESCE($5, about), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, company_name, website, industry, about, updated_at",
        )
        .bind(id)
        .bind(req.company_name)
        .bind(req.website)
        .bind(req.industry)
        .bind(req.about)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_employer error: {:?}", e);
            None
        })
    }
}

/// MockRepository
///
/// An in-memory implementation of `Repository` used exclusively for unit and
/// integration testing. Replacing the real store with this injected mock keeps
/// the authentication and routing flows testable without a database or any
/// process-wide state.
#[derive(Default)]
pub struct MockRepository {
    profiles: Mutex<Vec<Profile>>,
    jobs: Mutex<Vec<Job>>,
    applications: Mutex<Vec<Application>>,
    job_seekers: Mutex<Vec<JobSeeker>>,
    employers: Mutex<Vec<Employer>>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Test seeding / inspection helpers ---

    pub fn seed_profile(&self, profile: Profile) {
        self.profiles.lock().unwrap().push(profile);
    }

    pub fn seed_job(&self, job: Job) {
        self.jobs.lock().unwrap().push(job);
    }

    pub fn seed_application(&self, application: Application) {
        self.applications.lock().unwrap().push(application);
    }

    pub fn seed_job_seeker(&self, job_seeker: JobSeeker) {
        self.job_seekers.lock().unwrap().push(job_seeker);
    }

    pub fn seed_employer(&self, employer: Employer) {
        self.employers.lock().unwrap().push(employer);
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn applications(&self) -> Vec<Application> {
        self.applications.lock().unwrap().clone()
    }
}

#[async_trait]
impl Repository for MockRepository {
    async fn get_profile_by_subject(&self, subject: Uuid) -> Option<Profile> {
        self.profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == subject)
            .cloned()
    }

    async fn get_profile(&self, id: Uuid) -> Option<Profile> {
        self.profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    async fn create_profile(
        &self,
        subject: Uuid,
        role: Role,
        first_name: String,
        last_name: String,
    ) -> Option<Profile> {
        let profile = Profile {
            id: Uuid::new_v4(),
            user_id: subject,
            role,
            first_name,
            last_name,
            created_at: Utc::now(),
        };
        self.profiles.lock().unwrap().push(profile.clone());
        Some(profile)
    }

    async fn ensure_role_record(&self, profile_id: Uuid, role: Role) -> bool {
        match role {
            Role::JobSeeker => {
                let mut rows = self.job_seekers.lock().unwrap();
                if !rows.iter().any(|r| r.id == profile_id) {
                    rows.push(JobSeeker {
                        id: profile_id,
                        updated_at: Utc::now(),
                        ..JobSeeker::default()
                    });
                }
            }
            Role::Employer => {
                let mut rows = self.employers.lock().unwrap();
                if !rows.iter().any(|r| r.id == profile_id) {
                    rows.push(Employer {
                        id: profile_id,
                        updated_at: Utc::now(),
                        ..Employer::default()
                    });
                }
            }
            Role::Admin => {}
        }
        true
    }

    async fn get_jobs(&self) -> Vec<Job> {
        self.jobs.lock().unwrap().clone()
    }

    async fn get_job(&self, id: Uuid) -> Option<Job> {
        self.jobs.lock().unwrap().iter().find(|j| j.id == id).cloned()
    }

    async fn create_job(&self, job: NewJob, employer_id: Uuid) -> Option<Job> {
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4(),
            employer_id,
            title: job.title,
            company: job.company,
            description: job.description,
            location: job.location,
            job_type: job.job_type,
            salary_range: job.salary_range,
            required_skills: job.required_skills,
            benefits: job.benefits,
            status: "active".to_string(),
            created_at: now,
            updated_at: now,
        };
        self.jobs.lock().unwrap().push(job.clone());
        Some(job)
    }

    async fn get_jobs_for_employer(&self, employer_id: Uuid) -> Vec<Job> {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.employer_id == employer_id)
            .cloned()
            .collect()
    }

    async fn insert_application(
        &self,
        job_id: Uuid,
        job_seeker_id: Uuid,
        cover_letter: String,
    ) -> Option<Application> {
        let now = Utc::now();
        let application = Application {
            id: Uuid::new_v4(),
            job_id,
            job_seeker_id,
            cover_letter,
            status: ApplicationStatus::Submitted,
            submitted_at: now,
            updated_at: now,
        };
        self.applications.lock().unwrap().push(application.clone());
        Some(application)
    }

    async fn get_application(&self, id: Uuid) -> Option<Application> {
        self.applications
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    async fn get_application_employer(&self, id: Uuid) -> Option<Uuid> {
        let job_id = self.get_application(id).await?.job_id;
        self.get_job(job_id).await.map(|j| j.employer_id)
    }

    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Option<Application> {
        let mut rows = self.applications.lock().unwrap();
        let row = rows.iter_mut().find(|a| a.id == id)?;
        row.status = status;
        row.updated_at = Utc::now();
        Some(row.clone())
    }

    async fn get_applications_for_job_seeker(&self, job_seeker_id: Uuid) -> Vec<Application> {
        self.applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.job_seeker_id == job_seeker_id)
            .cloned()
            .collect()
    }

    async fn get_applications_for_job(&self, job_id: Uuid) -> Vec<Application> {
        self.applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect()
    }

    async fn get_job_seeker(&self, id: Uuid) -> Option<JobSeeker> {
        self.job_seekers
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    async fn update_job_seeker(&self, id: Uuid, req: UpdateJobSeekerRequest) -> Option<JobSeeker> {
        let mut rows = self.job_seekers.lock().unwrap();
        let row = rows.iter_mut().find(|r| r.id == id)?;
        if let Some(headline) = req.headline {
            row.headline = Some(headline);
        }
        if let Some(skills) = req.skills {
            row.skills = skills;
        }
        if let Some(location) = req.location {
            row.location = Some(location);
        }
        if let Some(resume_url) = req.resume_url {
            row.resume_url = Some(resume_url);
        }
        row.updated_at = Utc::now();
        Some(row.clone())
    }

    async fn get_employer(&self, id: Uuid) -> Option<Employer> {
        self.employers
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    async fn update_employer(&self, id: Uuid, req: UpdateEmployerRequest) -> Option<Employer> {
        let mut rows = self.employers.lock().unwrap();
        let row = rows.iter_mut().find(|r| r.id == id)?;
        if let Some(company_name) = req.company_name {
            row.company_name = Some(company_name);
        }
        if let Some(website) = req.website {
            row.website = Some(website);
        }
        if let Some(industry) = req.industry {
            row.industry = Some(industry);
        }
        if let Some(about) = req.about {
            row.about = Some(about);
        }
        row.updated_at = Utc::now();
        Some(row.clone())
    }
}
