use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use directory_server::server::{
    config::Configuration,
    router,
    services::{BusinessStore, TokenSigner},
    AdminCredentials, AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .init();

    let configuration = Configuration::new()?;
    tracing::info!("Configuration loaded successfully");

    let store = match &configuration.server.data_path {
        Some(path) => BusinessStore::open(path.clone()).await?,
        None => {
            tracing::warn!("No data_path configured, businesses are kept in memory only");
            BusinessStore::in_memory()
        }
    };

    let app_state = AppState {
        store: Arc::new(store),
        token_signer: Arc::new(TokenSigner::new(
            configuration.admin.jwt_secret.clone(),
            configuration.admin.token_ttl_seconds,
        )),
        admin: Arc::new(AdminCredentials {
            email: configuration.admin.email.clone(),
            password: configuration.admin.password.clone(),
        }),
    };

    let app = router(app_state, configuration.server.cors_allow_any);

    let addr = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
