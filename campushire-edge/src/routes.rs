//! Route definitions for the edge gateway

use crate::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Configuration
        .route("/config", get(handlers::get_config))
        // Dev-mode access cookie minting
        .route("/access-token", post(handlers::issue_access_token))
}

/// Create page routes
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(handlers::register_landing))
        .route("/register/company", get(handlers::company_registration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::AccessTokenService;
    use crate::EdgeConfig;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check_route() {
        let state = AppState::with_access_tokens(
            EdgeConfig::default(),
            AccessTokenService::new(b"test-secret"),
        );
        let app = api_routes().with_state(state);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(health["status"], "healthy");
    }
}
