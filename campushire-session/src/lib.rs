//! CampusHire Session - Client session runtime
//!
//! This module provides the authentication state a CampusHire client process
//! carries between page loads:
//!
//! - A storage port with file-backed and in-memory backends
//! - The token store persisting credentials across restarts
//! - An HTTP client for the platform's external auth service
//! - The session context mediating login/logout and exposing the current user
//!
//! ## Architecture
//!
//! This module follows a clear separation between:
//! - **Storage** (`storage`, `store`): durable credential persistence
//! - **Transport** (`client`): calls to the external auth endpoints
//! - **State** (`session`): the per-process source of truth for identity

pub mod client;
pub mod session;
pub mod storage;
pub mod store;

pub use client::{AuthClient, LoginOutcome};
pub use session::{SessionContext, SessionEvent};
pub use storage::{CredentialStorage, FileStorage, MemoryStorage, StorageError, StorageResult};
pub use store::{StoredCredentials, TokenStore};

// The domain types live in campushire-core; re-export the ones session
// consumers always need.
pub use campushire_core::{Role, UserProfile};

/// Session-level error type
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The auth service answered with a non-success status
    #[error("Authentication rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The auth service could not be reached
    #[error("Auth service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The auth service answered 2xx with a body we could not interpret
    #[error("Malformed auth service response: {message}")]
    MalformedResponse { message: String },

    /// The operation was abandoned before the auth service answered
    #[error("Login cancelled before completion")]
    Cancelled,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Create a rejection error carrying the server-provided message
    pub fn rejected<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Create a malformed-response error
    pub fn malformed_response<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// The message suitable for inline display on a login form
    pub fn display_message(&self) -> String {
        match self {
            AuthError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Session runtime configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the external auth service
    pub auth_base_url: String,
    /// Per-request timeout for auth calls, in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auth_base_url: "http://localhost:4000".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            auth_base_url: std::env::var("CAMPUSHIRE_AUTH_URL")
                .unwrap_or(defaults.auth_base_url),
            request_timeout_ms: std::env::var("CAMPUSHIRE_AUTH_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_ms),
        }
    }

    /// Configuration pointed at a specific service instance
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            auth_base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use super::{
        AuthError, AuthResult, CredentialStorage, FileStorage, MemoryStorage, Role, SessionConfig,
        SessionContext, SessionEvent, TokenStore, UserProfile,
    };
}
