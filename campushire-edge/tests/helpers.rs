//! Integration test helpers
//!
//! Spins up a complete edge gateway on a random port so tests drive it over
//! real HTTP, in the spirit of zero-to-production's test harness.

use std::sync::{Arc, LazyLock};

use tokio::net::TcpListener;

use campushire_edge::token::AccessTokenService;
use campushire_edge::{create_app, AppState, EdgeConfig};

/// Signing secret shared by the app under test and the minting helpers
pub const TEST_SECRET: &[u8] = b"edge-test-secret";

// Ensure tracing is initialized only once across the test binary
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

/// A running edge gateway instance
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub tokens: Arc<AccessTokenService>,
}

impl TestApp {
    /// GET a path with no cookies
    pub async fn get_path(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// GET a path presenting a raw `Cookie` header
    pub async fn get_path_with_cookie(&self, path: &str, cookie: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", self.address, path))
            .header("Cookie", cookie)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Mint an access token with the app's own signing secret
    pub fn mint_token(&self, ttl: chrono::Duration) -> String {
        self.tokens
            .issue("company-reg:test", ttl)
            .expect("Failed to mint access token")
    }
}

/// Start a test gateway in development mode
pub async fn spawn_app() -> TestApp {
    spawn_app_with_dev_mode(true).await
}

/// Start a test gateway with explicit development mode
pub async fn spawn_app_with_dev_mode(dev_mode: bool) -> TestApp {
    LazyLock::force(&TRACING);

    let config = EdgeConfig {
        host: "127.0.0.1".to_string(),
        port: 0, // Let the OS choose a free port
        dev_mode,
        ..EdgeConfig::default()
    };

    let tokens = Arc::new(AccessTokenService::new(TEST_SECRET));
    let state = AppState {
        config,
        access_tokens: tokens.clone(),
    };
    let app = create_app(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    let api_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        api_client,
        tokens,
    }
}

/// Assert a response is a 302 pointing at `location`
pub fn assert_is_redirect_to(response: &reqwest::Response, location: &str) {
    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(response.headers().get("Location").unwrap(), location);
}
