use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Claims;

/// ProviderUser
///
/// The minimal account record the identity provider reports back: the
/// canonical subject id (which keys our profiles table) and the email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderUser {
    pub id: Uuid,
    pub email: String,
}

/// ProviderSession
///
/// A full provider session as returned by login and refresh: a short-lived
/// access token, a refresh token, and the account it belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: ProviderUser,
}

/// AuthProviderError
///
/// Failures from the identity provider, split by who is at fault. `Rejected`
/// means the provider understood and refused the request (bad credentials,
/// duplicate email); `Unavailable` means the call itself failed. Callers map
/// these onto the client-facing error taxonomy without leaking the detail.
#[derive(Debug, Error)]
pub enum AuthProviderError {
    #[error("{0}")]
    Rejected(String),
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// AuthProvider
///
/// Abstract contract for the managed identity service. All credential storage,
/// password hashing, and token issuance live behind this trait; the API only
/// forwards signup/login/refresh calls and verifies the resulting access
/// tokens locally against the shared secret.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str)
    -> Result<ProviderUser, AuthProviderError>;
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, AuthProviderError>;
    async fn refresh(&self, refresh_token: &str) -> Result<ProviderSession, AuthProviderError>;
}

/// AuthProviderState
///
/// The concrete type used to share the identity provider client across the
/// application state.
pub type AuthProviderState = Arc<dyn AuthProvider>;

/// SupabaseAuthClient
///
/// The production implementation, talking to the Supabase GoTrue REST surface
/// (`/auth/v1/signup`, `/auth/v1/token`). The HTTP client carries an explicit
/// timeout so a stalled provider call fails fast instead of hanging the
/// request pipeline.
#[derive(Clone)]
pub struct SupabaseAuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct SignUpResponse {
    id: Uuid,
    email: String,
}

impl SupabaseAuthClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuthClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, AuthProviderError> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let response = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthProviderError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            // Duplicate email, weak password, etc. The provider's exact reason
            // is logged but not forwarded to the client.
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("signup rejected ({status}): {body}");
            return Err(AuthProviderError::Rejected(
                "Registration was rejected".to_string(),
            ));
        }

        let user = response
            .json::<SignUpResponse>()
            .await
            .map_err(|e| AuthProviderError::Unavailable(e.to_string()))?;

        Ok(ProviderUser {
            id: user.id,
            email: user.email,
        })
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, AuthProviderError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let response = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthProviderError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthProviderError::Rejected(
                "Invalid email or password".to_string(),
            ));
        }

        response
            .json::<ProviderSession>()
            .await
            .map_err(|e| AuthProviderError::Unavailable(e.to_string()))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<ProviderSession, AuthProviderError> {
        let url = format!("{}/auth/v1/token?grant_type=refresh_token", self.base_url);
        let response = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| AuthProviderError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthProviderError::Rejected(
                "Invalid or expired refresh token".to_string(),
            ));
        }

        response
            .json::<ProviderSession>()
            .await
            .map_err(|e| AuthProviderError::Unavailable(e.to_string()))
    }
}

/// MockAuthProvider
///
/// An in-memory identity provider used exclusively for testing. Accounts live
/// behind the injected instance rather than any process-wide state, and issued
/// access tokens are real HS256 JWTs signed with the configured secret so the
/// AuthUser extractor accepts them unchanged.
#[derive(Default)]
pub struct MockAuthProvider {
    jwt_secret: String,
    accounts: Mutex<HashMap<String, (Uuid, String)>>,
    refresh_tokens: Mutex<HashMap<String, (Uuid, String)>>,
}

impl MockAuthProvider {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            ..Self::default()
        }
    }

    fn issue_session(&self, subject: Uuid, email: &str) -> ProviderSession {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: subject,
            iat: now,
            exp: now + 3600,
        };
        let key = EncodingKey::from_secret(self.jwt_secret.as_bytes());
        let access_token =
            encode(&Header::default(), &claims, &key).unwrap_or_else(|_| "invalid".to_string());

        let refresh_token = Uuid::new_v4().to_string();
        self.refresh_tokens
            .lock()
            .unwrap()
            .insert(refresh_token.clone(), (subject, email.to_string()));

        ProviderSession {
            access_token,
            refresh_token,
            user: ProviderUser {
                id: subject,
                email: email.to_string(),
            },
        }
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, AuthProviderError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(AuthProviderError::Rejected(
                "Registration was rejected".to_string(),
            ));
        }
        let id = Uuid::new_v4();
        accounts.insert(email.to_string(), (id, password.to_string()));
        Ok(ProviderUser {
            id,
            email: email.to_string(),
        })
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, AuthProviderError> {
        let subject = {
            let accounts = self.accounts.lock().unwrap();
            match accounts.get(email) {
                Some((id, stored)) if stored == password => *id,
                _ => {
                    return Err(AuthProviderError::Rejected(
                        "Invalid email or password".to_string(),
                    ));
                }
            }
        };
        Ok(self.issue_session(subject, email))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<ProviderSession, AuthProviderError> {
        let entry = self
            .refresh_tokens
            .lock()
            .unwrap()
            .remove(refresh_token);
        match entry {
            Some((subject, email)) => Ok(self.issue_session(subject, &email)),
            None => Err(AuthProviderError::Rejected(
                "Invalid or expired refresh token".to_string(),
            )),
        }
    }
}
