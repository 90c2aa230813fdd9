use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use crate::audit::AuditEvent;
use crate::database::models::Car;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

use super::payload::{json_body, path_id, path_ids, CarBody, Created};

/// GET /dealerships/:id/cars
pub async fn list(
    State(state): State<AppState>,
    dealership_id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Vec<Car>>> {
    let Some(dealership_id) = path_id(dealership_id) else {
        return Ok(Json(Vec::new()));
    };

    let cars = state.store_call(state.store.list_cars(dealership_id)).await?;
    Ok(Json(cars))
}

/// GET /dealerships/:id/cars/:carId
pub async fn get(
    State(state): State<AppState>,
    ids: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<Json<Car>> {
    let (Some(dealership_id), Some(car_id)) = path_ids(ids) else {
        return Err(ApiError::car_not_found());
    };

    state
        .store_call(state.store.get_car(dealership_id, car_id))
        .await?
        .map(Json)
        .ok_or_else(ApiError::car_not_found)
}

/// POST /dealerships/:id/cars - returns `{"id": <new id>}`; 404 when the
/// dealership does not exist
pub async fn create(
    State(state): State<AppState>,
    dealership_id: Result<Path<String>, PathRejection>,
    payload: Result<Json<CarBody>, JsonRejection>,
) -> ApiResult<Json<Created>> {
    let fields = json_body(payload)?.into_fields()?;
    let dealership_id = path_id(dealership_id).ok_or_else(ApiError::dealership_not_found)?;

    let car_id = state
        .store_call(state.store.insert_car(dealership_id, &fields))
        .await?;

    state
        .audit
        .record(AuditEvent::CarCreated {
            dealership_id,
            car_id,
            make: fields.make,
            model: fields.model,
        })
        .await;

    Ok(Json(Created { id: car_id }))
}

/// PUT /dealerships/:id/cars/:carId - 200 even when no car matched
pub async fn update(
    State(state): State<AppState>,
    ids: Result<Path<(String, String)>, PathRejection>,
    payload: Result<Json<CarBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let fields = json_body(payload)?.into_fields()?;
    let (Some(dealership_id), Some(car_id)) = path_ids(ids) else {
        return Ok(StatusCode::OK);
    };

    let changed = state
        .store_call(state.store.update_car(dealership_id, car_id, &fields))
        .await?;

    if changed > 0 {
        state
            .audit
            .record(AuditEvent::CarUpdated {
                dealership_id,
                car_id,
                make: fields.make,
                model: fields.model,
            })
            .await;
    } else {
        tracing::debug!(dealership_id, car_id, "car update matched no row");
    }

    Ok(StatusCode::OK)
}

/// DELETE /dealerships/:id/cars/:carId
pub async fn delete(
    State(state): State<AppState>,
    ids: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<StatusCode> {
    let (Some(dealership_id), Some(car_id)) = path_ids(ids) else {
        return Ok(StatusCode::OK);
    };

    let removed = state
        .store_call(state.store.delete_car(dealership_id, car_id))
        .await?;

    if removed > 0 {
        state
            .audit
            .record(AuditEvent::CarDeleted {
                dealership_id,
                car_id,
            })
            .await;
    }

    Ok(StatusCode::OK)
}

/// DELETE /dealerships/:id/cars - removes every car of the dealership
pub async fn delete_all(
    State(state): State<AppState>,
    dealership_id: Result<Path<String>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Some(dealership_id) = path_id(dealership_id) else {
        return Ok(StatusCode::OK);
    };

    let removed = state.store_call(state.store.delete_cars(dealership_id)).await?;

    if removed > 0 {
        state
            .audit
            .record(AuditEvent::CarsCleared {
                dealership_id,
                cars_removed: removed,
            })
            .await;
    }

    Ok(StatusCode::OK)
}
