/// Auth Service - Main entry point
///
/// Starts the gRPC server with:
/// - credential store (PostgreSQL, or in-memory in development)
/// - HS256 token manager
/// - revocation cache with hourly sweeper
/// - gRPC health service
use anyhow::{Context, Result};
use auth_service::{
    config::Settings,
    db::{CredentialStore, InMemoryCredentialStore, PgCredentialStore},
    grpc::{AuthServiceImpl, AuthServiceServer},
    middleware::install_panic_hook,
    security::{
        token_revocation::DEFAULT_SWEEP_INTERVAL, JwtManager, PasswordHasher, RevocationCache,
    },
    SessionService,
};
use std::sync::Arc;
use tokio::signal;
use tonic::transport::Server;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "auth_service=info,info".into()),
        )
        .with_target(false)
        .json()
        .init();

    install_panic_hook();

    info!("Starting Auth Service");

    // Load configuration
    let settings = Settings::load().context("Failed to load configuration")?;
    info!(app_env = %settings.app_env, "Configuration loaded successfully");

    let jwt = Arc::new(
        JwtManager::from_secret(settings.jwt.secret.as_bytes())
            .context("Failed to initialize JWT manager")?,
    );
    info!("JWT manager initialized (HS256)");

    let store: Arc<dyn CredentialStore> = match &settings.database {
        Some(database) => {
            let store = PgCredentialStore::connect(database)
                .await
                .context("Failed to connect to database")?;
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set - using in-memory credential store (development only)");
            Arc::new(InMemoryCredentialStore::new())
        }
    };

    let revocations = Arc::new(RevocationCache::new());
    let sweeper = revocations.spawn_sweeper(DEFAULT_SWEEP_INTERVAL);

    let sessions = SessionService::new(
        store,
        PasswordHasher::default(),
        jwt,
        Arc::clone(&revocations),
    );

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<AuthServiceServer<AuthServiceImpl>>()
        .await;

    let addr = settings.server.grpc_addr()?;
    info!(
        %addr,
        request_timeout_secs = settings.server.request_timeout_secs,
        "Starting gRPC server"
    );

    Server::builder()
        .timeout(settings.server.request_timeout())
        .add_service(health_service)
        .add_service(AuthServiceImpl::new(sessions).into_server())
        .serve_with_shutdown(addr, shutdown_signal())
        .await
        .context("gRPC server error")?;

    sweeper.abort();
    info!("Auth service shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
