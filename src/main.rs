use std::net::SocketAddr;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use pitstop::config::EnvironmentConfig;
use pitstop::controllers::auth_controller::AuthController;
use pitstop::database::DatabaseConnection;
use pitstop::routes::create_router;
use pitstop::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .init();

    info!("🔧 Pitstop - automotive shop API");
    info!("================================");
    info!("Environment: {}", config.environment);

    let db_connection = match DatabaseConnection::new(&config).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Database connection failed: {:#}", e);
            return Err(e);
        }
    };
    db_connection.run_migrations().await?;
    let pool = db_connection.pool().clone();

    let state = AppState::new(pool, config);

    let bootstrap = AuthController::new(state.pool.clone(), state.jwt.clone());
    match bootstrap.bootstrap_admin(&state.config).await {
        Ok(Some(admin)) => info!("👤 Admin account ready: {}", admin.email),
        Ok(None) => {}
        Err(e) => warn!("⚠️ Admin bootstrap skipped: {}", e),
    }

    let addr: SocketAddr = state
        .config
        .server_url()
        .parse()
        .context("HOST and PORT do not form a valid socket address")?;
    let app = create_router(state);

    info!("🌐 Server listening on http://{}", addr);
    info!("🔍 Endpoints:");
    info!("   GET  /health");
    info!("   POST /auth/login   GET /auth/me   PATCH /auth/password   GET /auth/roles");
    info!("   /users  /bookings  /jobs  /inventory  /goods-requests  /invoices  /leave-requests");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Server error: {}", e);
            e
        })?;

    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {}", e);
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
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C received, shutting down...");
        },
        _ = terminate => {
            info!("🛑 Terminate signal received, shutting down...");
        },
    }
}
