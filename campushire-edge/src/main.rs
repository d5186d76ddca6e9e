//! CampusHire Edge Gateway
//!
//! Verifies signed company-access cookies at the request edge and gates the
//! company registration route on them.

use clap::Parser;

use campushire_edge::server::EdgeServerBuilder;
use campushire_edge::token::SECRET_ENV;
use campushire_edge::{init_logging, EdgeConfig};

/// CampusHire Edge Gateway - access gate for the company registration flow
#[derive(Parser)]
#[command(name = "campushire-edge")]
#[command(about = "Edge gateway for the CampusHire platform")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Enable development mode
    #[arg(long)]
    dev: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging first
    std::env::set_var(
        "RUST_LOG",
        format!("campushire_edge={},tower_http=debug", args.log_level),
    );
    init_logging();

    println!("🔧 Starting CampusHire Edge Gateway initialization...");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Create configuration
    let mut config = EdgeConfig::from_env();

    // Override with command line arguments
    config.host = args.host;
    config.port = args.port;
    if args.dev {
        config.dev_mode = true;
    }

    // Print startup information
    println!("🚀 Starting CampusHire Edge Gateway");
    println!("📍 Server: http://{}:{}", config.host, config.port);
    println!("🛡️  Guarded route: {}", config.guarded_path);
    println!("🔧 Development mode: {}", config.dev_mode);

    if config.dev_mode && std::env::var(SECRET_ENV).is_err() {
        println!("⚠️  Warning: {} is not set.", SECRET_ENV);
        println!("   The gateway will sign with the development secret.");
    }

    // Build and start the server
    println!("🏗️  Building server...");
    let server = match EdgeServerBuilder::new()
        .host(config.host.clone())
        .port(config.port)
        .dev_mode(config.dev_mode)
        .guarded_path(config.guarded_path.clone())
        .redirect_path(config.redirect_path.clone())
        .auth_base_url(config.auth_base_url.clone())
        .build()
    {
        Ok(server) => {
            println!("✅ Server built successfully");
            server
        }
        Err(e) => {
            eprintln!("❌ Failed to build server: {}", e);
            std::process::exit(1);
        }
    };

    // Start the server (this will block until shutdown)
    println!("🚀 Starting server...");
    if let Err(e) = server.start().await {
        eprintln!("❌ Server failed to start: {}", e);
        std::process::exit(1);
    }

    println!("✅ Server shut down gracefully");
}
