//! CampusHire Edge Gateway
//!
//! The request edge in front of the CampusHire frontend: verifies the signed
//! company-access cookie and gates the company registration route on it.
//! Verification is local; the gateway never calls out to the auth service.

pub mod guard;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod token;

// Re-export main types
pub use server::EdgeServer;
pub use state::AppState;
pub use token::{AccessClaims, AccessTokenService, TokenVerificationError};

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    // Configure CORS for the frontend dev servers
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_origin("http://127.0.0.1:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_credentials(true)
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]);

    Router::new()
        // API routes
        .nest("/api", routes::api_routes())
        // Page routes, including the guarded registration route
        .merge(routes::page_routes())
        // Add middleware; the access gate sees every request before routing
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::company_access_gate,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Configuration for the edge gateway
#[derive(Debug, Clone)]
pub struct EdgeConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Route gated behind the company access cookie
    pub guarded_path: String,
    /// Where rejected visitors are sent
    pub redirect_path: String,
    /// Auth service base URL, surfaced to the frontend via /api/config
    pub auth_base_url: String,
    /// Enable development mode
    pub dev_mode: bool,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            guarded_path: "/register/company".to_string(),
            redirect_path: "/register".to_string(),
            auth_base_url: "http://localhost:4000".to_string(),
            dev_mode: false,
        }
    }
}

impl EdgeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("CAMPUSHIRE_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("CAMPUSHIRE_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            guarded_path: std::env::var("CAMPUSHIRE_GUARDED_PATH")
                .unwrap_or_else(|_| "/register/company".to_string()),
            redirect_path: std::env::var("CAMPUSHIRE_REDIRECT_PATH")
                .unwrap_or_else(|_| "/register".to_string()),
            auth_base_url: std::env::var("CAMPUSHIRE_AUTH_URL")
                .unwrap_or_else(|_| "http://localhost:4000".to_string()),
            dev_mode: std::env::var("CAMPUSHIRE_DEV_MODE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        }
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error types for the edge gateway
#[derive(thiserror::Error, Debug)]
pub enum EdgeError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for edge operations
pub type EdgeResult<T> = Result<T, EdgeError>;

/// Initialize logging for the edge gateway
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campushire_edge=debug,tower_http=debug,axum=debug".into()),
        )
        .init();
}
