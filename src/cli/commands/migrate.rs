use crate::config::AppConfig;
use crate::database::manager;

pub async fn handle(config: &AppConfig) -> anyhow::Result<()> {
    let pool = manager::connect(&config.database).await?;
    manager::ensure_schema(&pool).await?;
    pool.close().await;
    Ok(())
}
