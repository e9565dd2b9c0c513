//! Stores API HTTP server
//!
//! Main entry point: loads configuration, prepares the database, and serves
//! the API until Ctrl+C or SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use stores_api::{
    AppState, auth::TokenManager, config::{self, CliArgs}, create_app, db, run_migrations,
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber
///
/// The returned guard flushes the non-blocking writer and must live until
/// the end of `main`.
fn init_tracing(args: &CliArgs) -> tracing_appender::non_blocking::WorkerGuard {
    let default_level = if args.debug {
        "stores_api=debug,tower_http=debug"
    } else {
        "stores_api=info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    let registry = tracing_subscriber::registry().with(filter);
    if args.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .init();
    }

    guard
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenv::dotenv().is_ok() {
        println!("Loaded .env file");
    }

    let args = CliArgs::parse();
    let _guard = init_tracing(&args);

    info!("Stores API v{} starting", env!("CARGO_PKG_VERSION"));

    let config = config::get_config(&args)?;
    if config.uses_default_secret() {
        warn!("JWT_SECRET_KEY is not set; signing tokens with the development secret");
    }

    let pool = db::init_pool(&config.database_url)?;
    {
        let mut conn = pool.get().context("Failed to get a connection for migrations")?;
        run_migrations(&mut conn)?;
    }
    info!("Database ready at {}", config.database_url);

    let tokens = TokenManager::new(config.token_settings());
    let app = create_app(AppState::new(Arc::new(pool), Arc::new(tokens)));

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}
