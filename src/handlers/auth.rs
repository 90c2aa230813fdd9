use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;

use crate::auth::Credentials;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

/// POST /login - issue a bearer token
///
/// Expected Input:
/// ```json
/// { "username": "demo", "password": "password" }
/// ```
///
/// Expected Output:
/// ```json
/// { "accessToken": "eyJhbGciOiJIUzI1NiI..." }
/// ```
///
/// The credentials are not checked: every caller receives a token for the
/// `demo` identity, and a missing or unreadable body is treated as empty
/// credentials.
pub async fn login(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<LoginResponse>> {
    let credentials: Credentials = serde_json::from_slice(&body).unwrap_or_default();

    let access_token = state.tokens.issue_token(&credentials).map_err(|e| {
        tracing::error!("{}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(LoginResponse { access_token }))
}
