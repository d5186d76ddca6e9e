//! HTTP client for the external auth service
//!
//! Thin wrapper over the platform's `/auth/*` endpoints. The client carries no
//! session state of its own; [`crate::SessionContext`] owns that.

use serde::{Deserialize, Serialize};
use tracing::debug;

use campushire_core::{Role, UserProfile};

use crate::{AuthError, AuthResult, SessionConfig};

/// Client for the platform's external auth endpoints
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
}

/// Login request body
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Password change request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest<'a> {
    email: &'a str,
    current_password: &'a str,
    new_password: &'a str,
}

/// Error payload the auth service returns alongside non-success statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Successful login response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub school_id: Option<String>,
    pub token: String,
    #[serde(default)]
    pub must_change_password: bool,
}

impl LoginOutcome {
    /// The profile for the user this login authenticated
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.user_id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            company_id: self.company_id.clone(),
            school_id: self.school_id.clone(),
        }
    }
}

impl AuthClient {
    /// Create a new auth client
    pub fn new(config: &SessionConfig) -> AuthResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.auth_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Exchange credentials for a token and profile
    ///
    /// A non-success status becomes [`AuthError::Rejected`] carrying the
    /// server's message; a success status with an uninterpretable body
    /// becomes [`AuthError::MalformedResponse`].
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<LoginOutcome> {
        let url = format!("{}/auth/login", self.base_url);
        debug!("Submitting login to: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::rejected(
                status.as_u16(),
                extract_server_message(status, &body),
            ));
        }

        response.json::<LoginOutcome>().await.map_err(|e| {
            if e.is_decode() {
                AuthError::malformed_response(e.to_string())
            } else {
                AuthError::Transport(e)
            }
        })
    }

    /// Replace the current password with a new one
    ///
    /// On a non-success status the raw response body becomes the error
    /// message, matching how the auth service reports these failures.
    pub async fn change_password(
        &self,
        email: &str,
        current_password: &str,
        new_password: &str,
    ) -> AuthResult<()> {
        let url = format!("{}/auth/change-password", self.base_url);
        debug!("Submitting password change to: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&ChangePasswordRequest {
                email,
                current_password,
                new_password,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                body.trim().to_string()
            };
            return Err(AuthError::rejected(status.as_u16(), message));
        }

        Ok(())
    }
}

/// Pull a human-readable message out of an auth service error response
///
/// The service usually answers `{"message": "..."}`; fall back to the raw
/// body, then to the status line, so the caller always has something to
/// show. An envelope that parses but carries a blank message reads as the
/// status line directly, never as the raw JSON text.
fn extract_server_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if parsed.message.trim().is_empty() {
            return status.canonical_reason().unwrap_or("Unknown error").to_string();
        }
        return parsed.message;
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status.canonical_reason().unwrap_or("Unknown error").to_string()
}
