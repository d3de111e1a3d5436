use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, ServerConfig};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::generation::{DalleClient, GenerationService, StableDiffusionClient};
use service::items::{ItemRepository, MongoItemRepository};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_bind_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", server.host, server.port).parse()?)
}

fn warn_missing_keys(cfg: &AppConfig) {
    if !cfg.openai.has_api_key() {
        warn!(section = "openai", "api key not configured; /dalle requests will be rejected upstream");
    }
    if !cfg.stable_diffusion.has_api_key() {
        warn!(section = "stable_diffusion", "api key not configured; /sd requests will be rejected upstream");
    }
}

/// Wire the generation clients around an item repository.
pub fn build_state(cfg: &AppConfig, items: Arc<dyn ItemRepository>) -> anyhow::Result<ServerState> {
    let dalle = DalleClient::new(&cfg.openai)?;
    let stable_diffusion = StableDiffusionClient::new(&cfg.stable_diffusion)?;
    let generation = GenerationService::new(Arc::clone(&items), dalle, stable_diffusion);
    Ok(ServerState::new(items, generation))
}

/// Router with the default middleware stack.
pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
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
    info!(event = "shutdown_signal", "shutdown signal received, draining connections");
}

/// Connect to MongoDB, serve until `shutdown` resolves, then close the client.
pub async fn run_with_config<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    warn_missing_keys(&cfg);

    let client = models::db::connect(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(format!("{e:#}")))?;
    let items: Arc<dyn ItemRepository> =
        Arc::new(MongoItemRepository::new(models::db::collection(&client, &cfg.database)));

    let app = build_app(build_state(&cfg, items)?);

    let addr = load_bind_addr(&cfg.server)?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "CRUD server running");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    client.shutdown().await;
    info!("mongodb client closed");
    Ok(())
}
