use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::models::CarFields;
use crate::error::ApiError;

/// Body of `POST /dealerships` and `PUT /dealerships/:id`.
#[derive(Debug, Default, Deserialize)]
pub struct DealershipBody {
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /dealerships/:id/cars` and `PUT /dealerships/:id/cars/:carId`.
#[derive(Debug, Default, Deserialize)]
pub struct CarBody {
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Response of the create endpoints.
#[derive(Debug, Serialize)]
pub struct Created {
    pub id: i64,
}

/// Path ids are plain integers. Anything else matches no row.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

/// Id from a single-segment path. A segment that cannot be decoded at all,
/// such as percent-encoded bytes that are not UTF-8, matches no row either.
pub fn path_id(path: Result<Path<String>, PathRejection>) -> Option<i64> {
    match path {
        Ok(Path(raw)) => parse_id(&raw),
        Err(rejection) => {
            tracing::debug!("unreadable path id: {}", rejection.body_text());
            None
        }
    }
}

/// `(dealership id, car id)` from a two-segment path.
pub fn path_ids(path: Result<Path<(String, String)>, PathRejection>) -> (Option<i64>, Option<i64>) {
    match path {
        Ok(Path((dealership_id, car_id))) => (parse_id(&dealership_id), parse_id(&car_id)),
        Err(rejection) => {
            tracing::debug!("unreadable path ids: {}", rejection.body_text());
            (None, None)
        }
    }
}

pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::invalid_json(rejection.body_text()))
}

fn required(
    field: &str,
    value: Option<String>,
    errors: &mut HashMap<String, String>,
) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            errors.insert(field.to_string(), "This field is required".to_string());
            String::new()
        }
    }
}

impl DealershipBody {
    pub fn into_name(self) -> Result<String, ApiError> {
        let mut errors = HashMap::new();
        let name = required("name", self.name, &mut errors);
        if errors.is_empty() {
            Ok(name)
        } else {
            Err(ApiError::validation_error(errors))
        }
    }
}

impl CarBody {
    pub fn into_fields(self) -> Result<CarFields, ApiError> {
        let mut errors = HashMap::new();
        let make = required("make", self.make, &mut errors);
        let model = required("model", self.model, &mut errors);
        if errors.is_empty() {
            Ok(CarFields { make, model })
        } else {
            Err(ApiError::validation_error(errors))
        }
    }
}
