//! Runs against a real PostgreSQL only when `DATABASE_URL` is set; otherwise
//! each test returns immediately.

use anyhow::Result;
use sqlx::PgPool;

use dealership_api::database::models::CarFields;
use dealership_api::database::{manager, DatabaseError, PgStore, Store};

async fn store() -> Result<Option<PgStore>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        return Ok(None);
    };
    let pool = PgPool::connect(&url).await?;
    manager::ensure_schema(&pool).await?;
    Ok(Some(PgStore::new(pool)))
}

#[tokio::test]
async fn rename_and_cascade_delete() -> Result<()> {
    let Some(store) = store().await? else {
        return Ok(());
    };

    let id = store.insert_dealership("Pg Motors").await?;
    assert_eq!(
        store.rename_dealership(id, "Pg Motors II").await?,
        Some("Pg Motors".to_string())
    );

    store.insert_car(id, &CarFields::new("Toyota", "Corolla")).await?;
    store.insert_car(id, &CarFields::new("Honda", "Civic")).await?;

    let removal = store.delete_dealership(id).await?;
    assert_eq!(removal.dealerships, 1);
    assert_eq!(removal.cars, 2);
    assert!(store.get_dealership(id).await?.is_none());
    assert!(store.list_cars(id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn car_under_missing_dealership_is_rejected() -> Result<()> {
    let Some(store) = store().await? else {
        return Ok(());
    };

    let err = store
        .insert_car(i64::MAX, &CarFields::new("Ford", "Ka"))
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::MissingDealership(id) if id == i64::MAX));
    Ok(())
}

#[tokio::test]
async fn cars_are_scoped_to_their_dealership() -> Result<()> {
    let Some(store) = store().await? else {
        return Ok(());
    };

    let a = store.insert_dealership("Scope A").await?;
    let b = store.insert_dealership("Scope B").await?;
    let car = store.insert_car(a, &CarFields::new("Tesla", "Model 3")).await?;

    assert!(store.get_car(b, car).await?.is_none());
    assert_eq!(store.update_car(b, car, &CarFields::new("X", "Y")).await?, 0);
    assert_eq!(store.delete_car(b, car).await?, 0);
    assert_eq!(store.get_car(a, car).await?.map(|c| c.model), Some("Model 3".to_string()));

    store.delete_dealership(a).await?;
    store.delete_dealership(b).await?;
    Ok(())
}
