use tracing::{error, info};

use crate::config::AppConfig;
use crate::database::models::CarFields;
use crate::database::{manager, PgStore, Store};

const DEALERSHIPS: &[&str] = &[
    "Auto World",
    "Car Nation",
    "Drive Time",
    "Elite Motors",
    "Prime Cars",
];

const CARS: &[(&str, &str)] = &[
    ("Toyota", "Corolla"),
    ("Honda", "Civic"),
    ("Ford", "Mustang"),
    ("Chevrolet", "Malibu"),
    ("Tesla", "Model 3"),
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub dealerships: usize,
    pub cars: usize,
    pub failures: usize,
}

pub async fn handle(config: &AppConfig) -> anyhow::Result<()> {
    let pool = manager::connect(&config.database).await?;
    manager::ensure_schema(&pool).await?;

    let store = PgStore::new(pool.clone());
    let summary = seed(&store).await;
    pool.close().await;
    info!("Database connection closed");

    if summary.failures > 0 {
        anyhow::bail!("seeding finished with {} failed inserts", summary.failures);
    }
    Ok(())
}

/// Insert every demo dealership with the full set of demo cars. A failed
/// insert is logged and counted; the remaining rows are still attempted.
pub async fn seed(store: &dyn Store) -> SeedSummary {
    let mut summary = SeedSummary::default();

    for name in DEALERSHIPS {
        let dealership_id = match store.insert_dealership(name).await {
            Ok(id) => id,
            Err(e) => {
                error!("Error inserting dealership: {}", e);
                summary.failures += 1;
                continue;
            }
        };
        info!("Inserted dealership with ID: {}", dealership_id);
        summary.dealerships += 1;

        for (make, model) in CARS {
            match store
                .insert_car(dealership_id, &CarFields::new(*make, *model))
                .await
            {
                Ok(_) => {
                    info!(
                        "Inserted car {} {} into dealership with ID: {}",
                        make, model, dealership_id
                    );
                    summary.cars += 1;
                }
                Err(e) => {
                    error!("Error inserting car: {}", e);
                    summary.failures += 1;
                }
            }
        }
    }

    summary
}
