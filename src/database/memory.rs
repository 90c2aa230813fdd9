use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Car, CarFields, Dealership};
use crate::database::store::{DealershipRemoval, Store};

/// In-process [`Store`] used by tests and by `serve --in-memory`.
///
/// Ids are assigned from 1 upwards and never reused, like a serial column.
/// Each operation holds the lock for its whole duration, which gives the
/// multi-row operations the same all-or-nothing behavior as a transaction.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    dealerships: BTreeMap<i64, Dealership>,
    cars: BTreeMap<i64, Car>,
    last_dealership_id: i64,
    last_car_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn owned_by(car: &Car, dealership_id: i64) -> bool {
    car.dealership_id == dealership_id
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_dealerships(&self) -> Result<Vec<Dealership>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.dealerships.values().cloned().collect())
    }

    async fn get_dealership(&self, id: i64) -> Result<Option<Dealership>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.dealerships.get(&id).cloned())
    }

    async fn insert_dealership(&self, name: &str) -> Result<i64, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.last_dealership_id += 1;
        let id = tables.last_dealership_id;
        tables.dealerships.insert(
            id,
            Dealership {
                id,
                name: name.to_string(),
            },
        );
        Ok(id)
    }

    async fn rename_dealership(&self, id: i64, name: &str) -> Result<Option<String>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .dealerships
            .get_mut(&id)
            .map(|dealership| std::mem::replace(&mut dealership.name, name.to_string())))
    }

    async fn delete_dealership(&self, id: i64) -> Result<DealershipRemoval, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.cars.len();
        tables.cars.retain(|_, car| !owned_by(car, id));
        let cars = (before - tables.cars.len()) as u64;
        let dealerships = u64::from(tables.dealerships.remove(&id).is_some());
        Ok(DealershipRemoval { dealerships, cars })
    }

    async fn list_cars(&self, dealership_id: i64) -> Result<Vec<Car>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .cars
            .values()
            .filter(|car| owned_by(car, dealership_id))
            .cloned()
            .collect())
    }

    async fn get_car(&self, dealership_id: i64, car_id: i64) -> Result<Option<Car>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .cars
            .get(&car_id)
            .filter(|car| owned_by(car, dealership_id))
            .cloned())
    }

    async fn insert_car(&self, dealership_id: i64, fields: &CarFields) -> Result<i64, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.dealerships.contains_key(&dealership_id) {
            return Err(DatabaseError::MissingDealership(dealership_id));
        }
        tables.last_car_id += 1;
        let id = tables.last_car_id;
        tables.cars.insert(
            id,
            Car {
                id,
                make: fields.make.clone(),
                model: fields.model.clone(),
                dealership_id,
            },
        );
        Ok(id)
    }

    async fn update_car(
        &self,
        dealership_id: i64,
        car_id: i64,
        fields: &CarFields,
    ) -> Result<u64, DatabaseError> {
        let mut tables = self.tables.write().await;
        match tables
            .cars
            .get_mut(&car_id)
            .filter(|car| owned_by(car, dealership_id))
        {
            Some(car) => {
                car.make = fields.make.clone();
                car.model = fields.model.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_car(&self, dealership_id: i64, car_id: i64) -> Result<u64, DatabaseError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .cars
            .get(&car_id)
            .is_some_and(|car| owned_by(car, dealership_id));
        if owned {
            tables.cars.remove(&car_id);
        }
        Ok(u64::from(owned))
    }

    async fn delete_cars(&self, dealership_id: i64) -> Result<u64, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.cars.len();
        tables.cars.retain(|_, car| !owned_by(car, dealership_id));
        Ok((before - tables.cars.len()) as u64)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
