use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

/// ResumeAttachment
///
/// An uploaded resume as received by the public application endpoint. The raw
/// bytes are kept in memory only for the lifetime of the request; the team
/// notification references the filename rather than re-transmitting the file.
#[derive(Debug, Clone)]
pub struct ResumeAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("mail gateway error: {0}")]
    Gateway(String),
}

/// Mailer
///
/// Abstract contract for outbound notification email. Email is an auxiliary
/// channel: callers log failures and carry on, so nothing behind this trait
/// may ever fail the overall request.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Auto-responder sent to an applicant confirming their submission.
    async fn send_applicant_confirmation(
        &self,
        to: &str,
        applicant_name: &str,
        job_title: &str,
    ) -> Result<(), MailerError>;

    /// Notification sent to the team inbox with the application details.
    async fn send_team_notification(
        &self,
        applicant_name: &str,
        applicant_email: &str,
        job_title: &str,
        cover_letter: &str,
        resume: Option<&ResumeAttachment>,
    ) -> Result<(), MailerError>;
}

/// MailerState
///
/// The concrete type used to share the mail service across the application state.
pub type MailerState = Arc<dyn Mailer>;

/// HttpMailer
///
/// The production implementation, posting JSON to an HTTP mail gateway
/// (Resend-style `POST /emails` with a bearer key). Like the identity client,
/// it carries an explicit timeout so a stalled gateway fails fast.
#[derive(Clone)]
pub struct HttpMailer {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
    team_inbox: String,
}

impl HttpMailer {
    pub fn new(endpoint: &str, api_key: &str, from: &str, team_inbox: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            http,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            from: from.to_string(),
            team_inbox: team_inbox.to_string(),
        }
    }

    async fn deliver(
        &self,
        to: &str,
        subject: &str,
        html: String,
    ) -> Result<(), MailerError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "from": self.from,
                "to": [to],
                "subject": subject,
                "html": html,
            }))
            .send()
            .await
            .map_err(|e| MailerError::Gateway(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MailerError::Gateway(format!("{status}: {body}")));
        }
        Ok(())
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_applicant_confirmation(
        &self,
        to: &str,
        applicant_name: &str,
        job_title: &str,
    ) -> Result<(), MailerError> {
        let html = format!(
            "<p>Hi {applicant_name},</p>\
             <p>Thank you for applying for <strong>{job_title}</strong> through PATHMATCH. \
             Our team has received your application and will be in touch if your profile \
             is a match.</p>\
             <p>— The PATHMATCH team</p>"
        );
        self.deliver(to, "We received your application", html).await
    }

    async fn send_team_notification(
        &self,
        applicant_name: &str,
        applicant_email: &str,
        job_title: &str,
        cover_letter: &str,
        resume: Option<&ResumeAttachment>,
    ) -> Result<(), MailerError> {
        let resume_line = match resume {
            Some(r) => format!("Resume uploaded: {}", r.filename),
            None => "No resume uploaded".to_string(),
        };
        let html = format!(
            "<p>New application for <strong>{job_title}</strong></p>\
             <ul>\
             <li>Name: {applicant_name}</li>\
             <li>Email: {applicant_email}</li>\
             <li>{resume_line}</li>\
             </ul>\
             <p>Cover letter:</p><p>{cover_letter}</p>"
        );
        let subject = format!("New application: {job_title}");
        self.deliver(&self.team_inbox, &subject, html).await
    }
}

/// SentEmail
///
/// A record of one delivery attempt captured by the MockMailer, used by tests
/// to assert on notification side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
}

/// MockMailer
///
/// A recording implementation of `Mailer` used exclusively for testing. It can
/// be flipped into a failing mode to verify that email failures are swallowed
/// and never fail the overall request.
#[derive(Default)]
pub struct MockMailer {
    sent: Mutex<Vec<SentEmail>>,
    should_fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Everything "delivered" so far.
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_applicant_confirmation(
        &self,
        to: &str,
        _applicant_name: &str,
        job_title: &str,
    ) -> Result<(), MailerError> {
        if self.should_fail {
            return Err(MailerError::Gateway("simulated failure".to_string()));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: format!("We received your application: {job_title}"),
        });
        Ok(())
    }

    async fn send_team_notification(
        &self,
        _applicant_name: &str,
        _applicant_email: &str,
        job_title: &str,
        _cover_letter: &str,
        _resume: Option<&ResumeAttachment>,
    ) -> Result<(), MailerError> {
        if self.should_fail {
            return Err(MailerError::Gateway("simulated failure".to_string()));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: "team".to_string(),
            subject: format!("New application: {job_title}"),
        });
        Ok(())
    }
}
