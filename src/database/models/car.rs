use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A car row. Serialized with the `dealershipId` key the API has always used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: i64,
    pub make: String,
    pub model: String,
    #[serde(rename = "dealershipId")]
    pub dealership_id: i64,
}

/// The mutable columns of a car, shared by insert and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarFields {
    pub make: String,
    pub model: String,
}

impl CarFields {
    pub fn new(make: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
        }
    }
}
