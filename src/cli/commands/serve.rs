use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{manager, MemoryStore, PgStore, Store};
use crate::server;

pub async fn handle(config: &AppConfig, in_memory: bool) -> anyhow::Result<()> {
    tracing::info!("Starting dealership API in {:?} mode", config.environment);

    let store: Arc<dyn Store> = if in_memory {
        tracing::warn!("Using in-memory store; data is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        let pool = manager::connect(&config.database).await?;
        manager::ensure_schema(&pool).await?;
        Arc::new(PgStore::new(pool))
    };

    server::serve(config, store).await
}
