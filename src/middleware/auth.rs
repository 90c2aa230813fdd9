use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated identity decoded from the bearer token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
        }
    }
}

/// Bearer token gate for every resource route.
///
/// No token → 401. A token that does not verify → 403. Otherwise the decoded
/// [`AuthUser`] is added to the request extensions and the handler runs.
pub async fn require_bearer(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&headers).ok_or(ApiError::Unauthorized)?;
    // Bytes outside UTF-8 can never form a token we issued.
    let token = std::str::from_utf8(token).map_err(|_| ApiError::Forbidden)?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::debug!("rejected bearer token: {}", e);
        ApiError::Forbidden
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

/// The credential is the second whitespace-separated part of the header,
/// so `Bearer` alone counts as missing. The raw bytes are returned: a header
/// that is present but not ASCII still carries a (bad) token.
fn extract_token(headers: &HeaderMap) -> Option<&[u8]> {
    headers
        .get(AUTHORIZATION)?
        .as_bytes()
        .split(|b| b.is_ascii_whitespace())
        .filter(|part| !part.is_empty())
        .nth(1)
}
