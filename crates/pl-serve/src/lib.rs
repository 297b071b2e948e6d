pub mod config;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod socket;
pub mod sse;

use axum::Router;
use pl_core::error::PersistenceError;
use pl_core::{PlayerLog, PlayerLogError};
use pl_db::schema;
use pl_db::store::DbStore;
use pl_events::{Broadcaster, ConnectionRegistry};
use std::path::Path;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub db_path: String,
    pub broadcaster: Broadcaster,
}

impl AppState {
    pub fn new(db_path: impl Into<String>, broadcaster: Broadcaster) -> Self {
        Self {
            db_path: db_path.into(),
            broadcaster,
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        self.broadcaster.registry()
    }
}

pub fn build_playerlog(state: &AppState) -> Result<PlayerLog<DbStore>, PlayerLogError> {
    let store = DbStore::open(&state.db_path)?;
    Ok(PlayerLog::new(store, state.broadcaster.clone()))
}

/// Creates the parent directory and bootstraps the schema. Run once before serving.
pub fn prepare_database(db_path: &str) -> Result<(), PersistenceError> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| PersistenceError::Open {
                message: format!("{}: {err}", parent.display()),
            })?;
        }
    }
    schema::open_and_migrate(db_path).map_err(|err| PersistenceError::Open {
        message: err.to_string(),
    })?;
    Ok(())
}

pub fn app(state: AppState) -> Router {
    routes::router(state)
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, state).await
}

pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    info!(%addr, db_path = %state.db_path, "listening");
    axum::serve(listener, app(state)).await
}
