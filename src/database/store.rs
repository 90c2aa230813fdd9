use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Car, CarFields, Dealership};

/// Rows removed by a dealership delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DealershipRemoval {
    pub dealerships: u64,
    pub cars: u64,
}

/// Data access for dealerships and their cars.
///
/// Every car operation takes the owning dealership id and must match on both
/// ids, so a car is never visible under a dealership it does not belong to.
/// Operations that touch more than one row set run as a single unit: either
/// everything is applied or nothing is.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_dealerships(&self) -> Result<Vec<Dealership>, DatabaseError>;

    async fn get_dealership(&self, id: i64) -> Result<Option<Dealership>, DatabaseError>;

    /// Returns the id assigned to the new dealership.
    async fn insert_dealership(&self, name: &str) -> Result<i64, DatabaseError>;

    /// Renames a dealership and returns its previous name, or `None` when no
    /// dealership has this id.
    async fn rename_dealership(&self, id: i64, name: &str) -> Result<Option<String>, DatabaseError>;

    /// Deletes a dealership together with all of its cars.
    async fn delete_dealership(&self, id: i64) -> Result<DealershipRemoval, DatabaseError>;

    async fn list_cars(&self, dealership_id: i64) -> Result<Vec<Car>, DatabaseError>;

    async fn get_car(&self, dealership_id: i64, car_id: i64) -> Result<Option<Car>, DatabaseError>;

    /// Returns the id assigned to the new car, or
    /// [`DatabaseError::MissingDealership`] when the parent does not exist.
    async fn insert_car(&self, dealership_id: i64, fields: &CarFields) -> Result<i64, DatabaseError>;

    /// Returns the number of rows changed (0 or 1).
    async fn update_car(
        &self,
        dealership_id: i64,
        car_id: i64,
        fields: &CarFields,
    ) -> Result<u64, DatabaseError>;

    /// Returns the number of rows deleted (0 or 1).
    async fn delete_car(&self, dealership_id: i64, car_id: i64) -> Result<u64, DatabaseError>;

    /// Returns the number of cars deleted.
    async fn delete_cars(&self, dealership_id: i64) -> Result<u64, DatabaseError>;

    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> Result<(), DatabaseError>;
}
