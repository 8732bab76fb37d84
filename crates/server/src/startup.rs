use std::{env, net::SocketAddr, path::Path, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::calls::CallSessionManager;
use service::fixtures;
use service::session::FileSessionStore;
use service::storage::{MemStorage, Storage};

use crate::routes::{self, AppState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_config() -> configs::AppConfig {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "config not loaded, using defaults");
            configs::AppConfig::default()
        }
    }
}

/// Bind address from config, overridable with SERVER_HOST / SERVER_PORT.
fn load_bind_addr(cfg: &configs::ServerConfig) -> anyhow::Result<SocketAddr> {
    let host = env::var("SERVER_HOST").unwrap_or_else(|_| cfg.host.clone());
    let port = env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(cfg.port);
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Build the application state: session store, storage, call sessions.
pub async fn build_state(cfg: &configs::AppConfig) -> anyhow::Result<AppState> {
    if let Some(parent) = Path::new(&cfg.session.file_path).parent() {
        if !parent.as_os_str().is_empty() {
            common::env::ensure_data_dir(&parent.to_string_lossy()).await?;
        }
    }
    let sessions = FileSessionStore::new(&cfg.session.file_path, cfg.session.ttl_secs).await?;
    let storage: Arc<dyn Storage> = MemStorage::new(sessions);
    let calls = Arc::new(CallSessionManager::new(
        cfg.video.domain.clone(),
        cfg.video.script_url.clone(),
        cfg.video.room_prefix.clone(),
    ));

    if env::var("DOCTABA_SEED_DEMO").is_ok() {
        fixtures::seed_demo(storage.as_ref()).await?;
    }

    Ok(AppState { storage, calls })
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config();
    let state = build_state(&cfg).await?;

    let cors = build_cors();
    let app: Router = routes::build_router(state, cors);

    let addr = load_bind_addr(&cfg.server)?;
    info!(%addr, "starting doctaba server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
