//! Application state for the edge gateway

use std::sync::Arc;

use crate::token::AccessTokenService;
use crate::{EdgeConfig, EdgeResult};

/// Shared state handed to every handler and middleware layer
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: EdgeConfig,
    /// Company access token verification service
    pub access_tokens: Arc<AccessTokenService>,
}

impl AppState {
    /// Build state for the given configuration, reading the signing secret
    /// from the environment
    pub fn new(config: EdgeConfig) -> EdgeResult<Self> {
        let access_tokens = AccessTokenService::from_env(config.dev_mode)?;
        Ok(Self::with_access_tokens(config, access_tokens))
    }

    /// Build state around an explicit token service
    ///
    /// Lets tests inject a service with a known secret instead of touching
    /// process environment variables.
    pub fn with_access_tokens(config: EdgeConfig, access_tokens: AccessTokenService) -> Self {
        Self {
            config,
            access_tokens: Arc::new(access_tokens),
        }
    }
}
