use std::net::SocketAddr;

use dotenvy::dotenv;
use tracing::{error, info};

use stulink::logging::{init_tracing, shutdown_tracer};
use stulink::metrics::{init_metrics, metrics_app};
use stulink::router::init_router;
use stulink::state::init_app_state;
use stulink_config::ServerConfig;
use stulink_db::{DatabaseConfig, init_db_pool, run_migrations};

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    if let Err(e) = run().await {
        error!(error = ?e, "Server terminated");
        shutdown_tracer();
        std::process::exit(1);
    }

    shutdown_tracer();
}

async fn run() -> anyhow::Result<()> {
    let metrics_handle = init_metrics()?;

    let db_config = DatabaseConfig::from_env()
        .map_err(|e| anyhow::anyhow!("DATABASE_URL must be set: {}", e))?;
    let db = init_db_pool(&db_config).await?;
    run_migrations(&db).await?;

    let state = init_app_state(db);
    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_app(handle));
    }

    let server_config = ServerConfig::from_env();
    let addr = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🚀 Server running on http://{}", addr);
    info!("📚 Swagger UI available at http://{}/swagger-ui", addr);
    info!("📖 Scalar UI available at http://{}/scalar", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
