use axum::extract::Request;
use axum::ServiceExt;
use campusdesk::logging::{init_tracing, shutdown_tracer};
use campusdesk::metrics::{init_metrics, metrics_app};
use campusdesk::router::init_app;
use campusdesk::state::init_app_state;
use campusdesk_config::ServerConfig;
use dotenvy::dotenv;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = ServerConfig::from_env();
    init_tracing(&config)?;

    if let Some(handle) = init_metrics(config.observability_enabled)? {
        let metrics_addr = format!("{}:{}", config.host, config.metrics_port);
        let listener = tokio::net::TcpListener::bind(&metrics_addr).await?;
        info!(addr = %metrics_addr, "Metrics endpoint listening");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let state = init_app_state().await?;
    let app = init_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %config.bind_addr(), "Server running");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
