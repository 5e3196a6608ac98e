//! tokengate - username/password authentication with bearer tokens

use anyhow::Result;
use chrono::Duration;
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{Config, DEFAULT_JWT_SECRET, LoggingConfig};
use tokengate_api::{AppState, create_router};
use tokengate_auth::{PasswordHasher, PasswordScheme, TokenCodec, parse_algorithm};
use tokengate_db::Database;

/// tokengate - username/password authentication with bearer tokens
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "TOKENGATE_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "TOKENGATE_PORT")]
    port: Option<u16>,

    /// Token signing secret (overrides the config file)
    #[arg(long, env = "TOKENGATE_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;
    if let Some(secret) = args.jwt_secret {
        config.auth.jwt_secret = secret;
        config.validate()?;
    }

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting tokengate v{}", env!("CARGO_PKG_VERSION"));

    if config.auth.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("Using the default JWT secret; set auth.jwt_secret or TOKENGATE_JWT_SECRET");
    }

    // Create data directories
    if let Some(parent) = Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // Initialize database
    let db_path = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_path).await?;

    // Initialize token codec and password hasher
    let algorithm = parse_algorithm(&config.auth.algorithm)?;
    let codec = Arc::new(
        TokenCodec::new(&config.auth.jwt_secret, algorithm)?
            .with_default_ttl(Duration::minutes(config.auth.default_token_ttl_minutes)),
    );
    let scheme: PasswordScheme = config.auth.password_scheme.parse()?;
    info!(
        "Signing tokens with {:?}, hashing passwords with {}",
        algorithm, scheme
    );

    // Create application state
    let state = AppState::new(
        Arc::new(db),
        codec,
        PasswordHasher::new(scheme),
        Duration::minutes(config.auth.access_token_expire_minutes),
    )?;

    // Create router
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format.eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install CTRL+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
