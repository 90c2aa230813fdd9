use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use crate::audit::AuditEvent;
use crate::database::models::Dealership;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

use super::payload::{json_body, path_id, Created, DealershipBody};

/// GET /dealerships
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Dealership>>> {
    let dealerships = state.store_call(state.store.list_dealerships()).await?;
    Ok(Json(dealerships))
}

/// GET /dealerships/:id
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Dealership>> {
    let id = path_id(id).ok_or_else(ApiError::dealership_not_found)?;

    state
        .store_call(state.store.get_dealership(id))
        .await?
        .map(Json)
        .ok_or_else(ApiError::dealership_not_found)
}

/// POST /dealerships - returns `{"id": <new id>}`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<DealershipBody>, JsonRejection>,
) -> ApiResult<Json<Created>> {
    let name = json_body(payload)?.into_name()?;

    let id = state.store_call(state.store.insert_dealership(&name)).await?;
    state.audit.record(AuditEvent::DealershipCreated { id, name }).await;

    Ok(Json(Created { id }))
}

/// PUT /dealerships/:id - rename; 404 when the dealership does not exist
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<DealershipBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let name = json_body(payload)?.into_name()?;
    let id = path_id(id).ok_or_else(ApiError::dealership_not_found)?;

    let old_name = state
        .store_call(state.store.rename_dealership(id, &name))
        .await?
        .ok_or_else(ApiError::dealership_not_found)?;

    state
        .audit
        .record(AuditEvent::DealershipRenamed {
            id,
            old_name,
            new_name: name,
        })
        .await;

    Ok(StatusCode::OK)
}

/// DELETE /dealerships/:id - removes the dealership and all of its cars
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Some(id) = path_id(id) else {
        return Ok(StatusCode::OK);
    };

    let removal = state.store_call(state.store.delete_dealership(id)).await?;
    if removal.dealerships > 0 || removal.cars > 0 {
        state
            .audit
            .record(AuditEvent::DealershipDeleted {
                id,
                cars_removed: removal.cars,
            })
            .await;
    }

    Ok(StatusCode::OK)
}
