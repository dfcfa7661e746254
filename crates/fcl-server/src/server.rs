use std::sync::Arc;

use fcl_store::{FileKvStore, FileStoreConfig, InMemoryKvStore, SyncMode, DEFAULT_LOG_FILE};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, AppState, SharedStore};

/// FCL HTTP server.
pub struct FclServer {
    config: ServerConfig,
    store: SharedStore,
}

impl FclServer {
    /// Create a server, opening the store the configuration names.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store = open_store(&config)?;
        Ok(Self { config, store })
    }

    /// Create a server over an existing store.
    pub fn with_store(config: ServerConfig, store: SharedStore) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState::new(Arc::clone(&self.store)))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "FCL server listening");
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

fn open_store(config: &ServerConfig) -> ServerResult<SharedStore> {
    match &config.data_dir {
        Some(dir) => {
            let sync_mode = if config.sync_every_write {
                SyncMode::EveryWrite
            } else {
                SyncMode::OsDefault
            };
            let path = dir.join(DEFAULT_LOG_FILE);
            let store = FileKvStore::open(&path, FileStoreConfig { sync_mode })?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("no data_dir configured; records are kept in memory only");
            Ok(Arc::new(InMemoryKvStore::new()))
        }
    }
}
