//! CampusHire session inspector
//!
//! Diagnostic tool for operators: logs in against a CampusHire auth service,
//! or reports whatever session the local credential storage currently holds.

use std::sync::Arc;

use clap::Parser;

use campushire_core::{init_logging, LoggingConfig};
use campushire_session::{FileStorage, SessionConfig, SessionContext};

/// Inspect or establish a persisted CampusHire session
#[derive(Parser)]
#[command(name = "whoami")]
#[command(about = "Inspect the locally persisted CampusHire session")]
#[command(version)]
struct Args {
    /// Credential storage directory
    #[arg(long, default_value = ".campushire")]
    storage_dir: String,

    /// Log in with this email before reporting (requires --password)
    #[arg(long, requires = "password")]
    email: Option<String>,

    /// Password for --email
    #[arg(long, requires = "email")]
    password: Option<String>,

    /// Clear the persisted session instead of reporting it
    #[arg(long)]
    logout: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    let logging_config = LoggingConfig {
        level: args.log_level.clone(),
        filter_directives: Vec::new(),
        ..LoggingConfig::default()
    };
    if let Err(e) = init_logging(&logging_config) {
        eprintln!("⚠️  Failed to initialize logging: {}", e);
    }

    let storage = match FileStorage::new(&args.storage_dir) {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("❌ Cannot open credential storage: {}", e);
            std::process::exit(1);
        }
    };

    let context = match SessionContext::new(SessionConfig::from_env(), Arc::new(storage)) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("❌ Cannot create session context: {}", e);
            std::process::exit(1);
        }
    };

    context.initialize();

    if args.logout {
        context.logout();
        println!("👋 Session cleared");
        return;
    }

    if let (Some(email), Some(password)) = (&args.email, &args.password) {
        match context.login(email, password).await {
            Ok(user) => {
                println!("✅ Logged in as {}", user.display_string());
            }
            Err(e) => {
                eprintln!("❌ Login failed: {}", e.display_message());
                std::process::exit(1);
            }
        }
    }

    match context.current_user() {
        Some(user) => {
            println!("👤 Active session: {}", user.display_string());
            if context.token().is_some() {
                println!("🔑 Bearer token present");
            }
            if context.must_change_password() {
                println!("🔐 Password change required before normal use");
            }
        }
        None => {
            println!("🚫 No active session in {}", args.storage_dir);
        }
    }
}
