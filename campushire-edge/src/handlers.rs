//! Request handlers for the edge gateway

use axum::{
    extract::{Json as JsonExtractor, Request, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::guard::COMPANY_ACCESS_COOKIE;
use crate::token::AccessClaims;
use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Non-sensitive configuration echo for the frontend
pub async fn get_config(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "host": state.config.host,
        "port": state.config.port,
        "dev_mode": state.config.dev_mode,
        "auth_base_url": state.config.auth_base_url,
    }))
}

/// Registration landing page
pub async fn register_landing() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>CampusHire - Register</title></head>
<body>
    <h1>Create your CampusHire account</h1>
    <p>Students and schools can register directly. Company registration
    requires the invitation link from your verification email.</p>
</body>
</html>"#,
    )
}

/// Company registration page, reachable through the access gate
///
/// When the gate verified a cookie, the claims ride along in the request
/// extensions; without a cookie the page still renders and the client-side
/// flow asks for verification.
pub async fn company_registration(request: Request) -> Html<String> {
    let status_line = match request.extensions().get::<AccessClaims>() {
        Some(claims) => format!("<p>Resuming registration for {}.</p>", claims.sub),
        None => "<p>No invitation found. Request a verification email to continue.</p>".to_string(),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>CampusHire - Company Registration</title></head>
<body>
    <h1>Company registration</h1>
    {}
</body>
</html>"#,
        status_line
    ))
}

/// Request body for the dev-mode token minting endpoint
#[derive(Debug, Deserialize)]
pub struct IssueAccessTokenRequest {
    /// What the token grants access to (the company registration identity)
    pub subject: String,
    /// Token lifetime in minutes
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: i64,
}

fn default_ttl_minutes() -> i64 {
    30
}

/// Response for the dev-mode token minting endpoint
#[derive(Debug, Serialize)]
pub struct IssueAccessTokenResponse {
    pub token: String,
    pub expires_in_minutes: i64,
}

/// Mint a company access cookie for local testing
///
/// Only answers in development mode; in production the verification email
/// flow is the sole source of these tokens and this endpoint plays dead.
pub async fn issue_access_token(
    State(state): State<AppState>,
    JsonExtractor(request): JsonExtractor<IssueAccessTokenRequest>,
) -> Result<Response, StatusCode> {
    if !state.config.dev_mode {
        return Err(StatusCode::NOT_FOUND);
    }

    match state
        .access_tokens
        .issue(&request.subject, Duration::minutes(request.ttl_minutes))
    {
        Ok(token) => {
            let cookie = format!(
                "{}={}; Path=/; Max-Age={}; HttpOnly",
                COMPANY_ACCESS_COOKIE,
                token,
                request.ttl_minutes * 60
            );

            Ok((
                [(header::SET_COOKIE, cookie)],
                Json(IssueAccessTokenResponse {
                    token,
                    expires_in_minutes: request.ttl_minutes,
                }),
            )
                .into_response())
        }
        Err(e) => {
            tracing::error!("Failed to issue access token: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
