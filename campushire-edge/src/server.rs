//! Edge gateway server
//!
//! Main server implementation using Axum.

use crate::{create_app, AppState, EdgeConfig, EdgeError, EdgeResult};
use axum::serve;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Main edge gateway server
pub struct EdgeServer {
    config: EdgeConfig,
    state: AppState,
}

impl EdgeServer {
    /// Create a new edge server
    pub fn new(config: EdgeConfig) -> EdgeResult<Self> {
        let state = AppState::new(config.clone())?;

        Ok(Self { config, state })
    }

    /// Start the edge server
    pub async fn start(self) -> EdgeResult<()> {
        let address = self.config.address();

        info!("🚀 Starting CampusHire Edge Gateway");
        info!("📍 Server address: http://{}", address);
        info!("🛡️  Guarded route: {}", self.config.guarded_path);
        info!("🔧 Development mode: {}", self.config.dev_mode);

        // Create the application
        let app = create_app(self.state.clone());

        // Create TCP listener
        let listener = TcpListener::bind(&address)
            .await
            .map_err(EdgeError::Server)?;

        info!("✅ Server listening on http://{}", address);

        // Start the server
        if let Err(e) = serve(listener, app).await {
            error!("❌ Server error: {}", e);
            return Err(EdgeError::Server(e));
        }

        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Builder for EdgeServer
pub struct EdgeServerBuilder {
    config: EdgeConfig,
}

impl EdgeServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self {
            config: EdgeConfig::default(),
        }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Enable development mode
    pub fn dev_mode(mut self, dev_mode: bool) -> Self {
        self.config.dev_mode = dev_mode;
        self
    }

    /// Set the guarded route
    pub fn guarded_path<S: Into<String>>(mut self, path: S) -> Self {
        self.config.guarded_path = path.into();
        self
    }

    /// Set the rejection redirect target
    pub fn redirect_path<S: Into<String>>(mut self, path: S) -> Self {
        self.config.redirect_path = path.into();
        self
    }

    /// Set the auth service base URL surfaced to the frontend
    pub fn auth_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.auth_base_url = url.into();
        self
    }

    /// Build the server
    pub fn build(self) -> EdgeResult<EdgeServer> {
        EdgeServer::new(self.config)
    }
}

impl Default for EdgeServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to start a server with the given configuration
pub async fn start_server(config: EdgeConfig) -> EdgeResult<()> {
    let server = EdgeServer::new(config)?;
    server.start().await
}
