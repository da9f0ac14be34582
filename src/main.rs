//! Application entry point and server initialization
//!
//! This module contains the main function that:
//! - Loads environment configuration
//! - Initializes the local storage database
//! - Starts the HTTP server with graceful shutdown support

use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use linkly::config::{Config, DEFAULT_LOG_FILTER};
use linkly::database::{init_db, AppState};
use linkly::route::create_app;

/// Application entry point
///
/// # Environment Variables
///
/// - `HOST` - Bind address (default: 127.0.0.1)
/// - `PORT` - Server port number (default: 8080)
/// - `DATABASE_URL` - Path to database file (default: "linkly.db")
/// - `AUTHORIZATION` - Optional token required on `/api` routes
/// - `RUST_LOG` - Log filter (default: "linkly=debug,tower_http=debug")
#[tokio::main]
async fn main() {
    // RUST_LOG may come from .env, so load it before the subscriber.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env();

    let db = match init_db(&config.database_path) {
        Ok(db) => db,
        Err(err) => {
            error!(error = %err, path = %config.database_path, "failed to initialize database");
            std::process::exit(1);
        }
    };

    let state = AppState::new(db, &config);
    let app = create_app(state).layer(TraceLayer::new_for_http());

    let addr = config.bind_addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, %addr, "failed to bind");
            std::process::exit(1);
        }
    };

    info!("🚀 Server running at http://{}", addr);
    info!("📂 Using database: {}", config.database_path);
    if config.auth_token.is_some() {
        info!("🔒 API access token required");
    }

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %err, "server error");
    }
}

/// Waits for SIGINT (Ctrl+C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received, stopping server.");
}
