use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Car, CarFields, Dealership};
use crate::database::store::{DealershipRemoval, Store};

/// [`Store`] backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_dealerships(&self) -> Result<Vec<Dealership>, DatabaseError> {
        let rows = sqlx::query_as::<_, Dealership>("SELECT id, name FROM dealership ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_dealership(&self, id: i64) -> Result<Option<Dealership>, DatabaseError> {
        let row = sqlx::query_as::<_, Dealership>("SELECT id, name FROM dealership WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_dealership(&self, name: &str) -> Result<i64, DatabaseError> {
        let id: i64 = sqlx::query_scalar("INSERT INTO dealership (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn rename_dealership(&self, id: i64, name: &str) -> Result<Option<String>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Lock the row so the reported old name is the one actually replaced.
        let old_name: Option<String> =
            sqlx::query_scalar("SELECT name FROM dealership WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(old_name) = old_name else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("UPDATE dealership SET name = $1 WHERE id = $2")
            .bind(name)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(old_name))
    }

    async fn delete_dealership(&self, id: i64) -> Result<DealershipRemoval, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let cars = sqlx::query("DELETE FROM car WHERE dealership_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let dealerships = sqlx::query("DELETE FROM dealership WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(DealershipRemoval { dealerships, cars })
    }

    async fn list_cars(&self, dealership_id: i64) -> Result<Vec<Car>, DatabaseError> {
        let rows = sqlx::query_as::<_, Car>(
            "SELECT id, make, model, dealership_id FROM car WHERE dealership_id = $1 ORDER BY id",
        )
        .bind(dealership_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_car(&self, dealership_id: i64, car_id: i64) -> Result<Option<Car>, DatabaseError> {
        let row = sqlx::query_as::<_, Car>(
            "SELECT id, make, model, dealership_id FROM car WHERE id = $1 AND dealership_id = $2",
        )
        .bind(car_id)
        .bind(dealership_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_car(&self, dealership_id: i64, fields: &CarFields) -> Result<i64, DatabaseError> {
        let inserted = sqlx::query_scalar::<_, i64>(
            "INSERT INTO car (make, model, dealership_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&fields.make)
        .bind(&fields.model)
        .bind(dealership_id)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(id) => Ok(id),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(DatabaseError::MissingDealership(dealership_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_car(
        &self,
        dealership_id: i64,
        car_id: i64,
        fields: &CarFields,
    ) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            "UPDATE car SET make = $1, model = $2 WHERE id = $3 AND dealership_id = $4",
        )
        .bind(&fields.make)
        .bind(&fields.model)
        .bind(car_id)
        .bind(dealership_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_car(&self, dealership_id: i64, car_id: i64) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM car WHERE id = $1 AND dealership_id = $2")
            .bind(car_id)
            .bind(dealership_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_cars(&self, dealership_id: i64) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM car WHERE dealership_id = $1")
            .bind(dealership_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
