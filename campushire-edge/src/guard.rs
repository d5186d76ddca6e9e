//! Company registration route guard
//!
//! Middleware gating the company registration route behind the signed
//! `company_access_token` cookie. Requests elsewhere pass through untouched,
//! and so do guarded requests without the cookie; only a cookie that fails
//! verification turns the visitor away.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::AppState;

/// Cookie carrying the signed company access token
pub const COMPANY_ACCESS_COOKIE: &str = "company_access_token";

/// Gate the configured route behind the company access cookie
///
/// Verified claims are attached to the request extensions for downstream
/// handlers. A cookie that fails verification gets a 302 to the redirect
/// path, and the response expires the cookie so the browser stops
/// presenting it.
pub async fn company_access_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if !is_guarded_path(request.uri().path(), &state.config.guarded_path) {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookies| extract_cookie(cookies, COMPANY_ACCESS_COOKIE));

    let Some(token) = token else {
        // Absence is not failure; the page-level flow handles the
        // unauthenticated visitor
        return next.run(request).await;
    };

    match state.access_tokens.verify(&token) {
        Ok(claims) => {
            debug!("Company access granted for: {}", claims.sub);
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            debug!("Company access token rejected: {}", e);
            redirect_and_clear_cookie(&state.config.redirect_path)
        }
    }
}

/// Whether a request path falls under the guarded route
///
/// The gate covers the configured path and its entire subtree:
/// `/register/company` and `/register/company/verify` both match, the
/// longer sibling `/register/companyX` does not.
fn is_guarded_path(path: &str, guarded: &str) -> bool {
    path == guarded
        || path
            .strip_prefix(guarded)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Pull a single cookie value out of a `Cookie` header
fn extract_cookie(cookie_header: &str, name: &str) -> Option<String> {
    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie
            .strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('='))
        {
            return Some(value.to_string());
        }
    }
    None
}

/// 302 that sends the visitor to the redirect path and expires the cookie
fn redirect_and_clear_cookie(redirect_path: &str) -> Response {
    // Redirect::temporary is 307 and Redirect::to is 303; the browser
    // clients expect a plain 302 here
    let clear_cookie = format!("{}=; Path=/; Max-Age=0; HttpOnly", COMPANY_ACCESS_COOKIE);

    (
        StatusCode::FOUND,
        [
            (header::LOCATION, redirect_path.to_string()),
            (header::SET_COOKIE, clear_cookie),
        ],
    )
        .into_response()
}
