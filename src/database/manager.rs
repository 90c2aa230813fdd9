use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors surfaced by the store layer.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Dealership {0} does not exist")]
    MissingDealership(i64),

    #[error("Store call exceeded {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS dealership (
        id   BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS car (
        id            BIGSERIAL PRIMARY KEY,
        make          TEXT NOT NULL,
        model         TEXT NOT NULL,
        dealership_id BIGINT NOT NULL REFERENCES dealership (id) ON DELETE CASCADE
    )",
    "CREATE INDEX IF NOT EXISTS car_dealership_id_idx ON car (dealership_id)",
];

pub fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .database(&config.database);

    if config.password.is_empty() {
        options
    } else {
        options.password(&config.password)
    }
}

/// Open the connection pool shared by every request.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect_with(connect_options(config))
        .await?;

    info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        "Connected to the database"
    );
    Ok(pool)
}

/// Create the dealership and car tables when they are missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA {
        sqlx::query(*statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("Database schema is up to date");
    Ok(())
}
