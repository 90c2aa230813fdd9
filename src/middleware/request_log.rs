use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

use crate::audit::AuditEvent;
use crate::state::AppState;

/// Record every inbound request in the application log and the audit file.
///
/// The audit write runs on its own task; the request never waits for it.
pub async fn log_request(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    let event = AuditEvent::Request {
        method: request.method().to_string(),
        uri: request.uri().to_string(),
        ip,
    };
    let audit = state.audit.clone();
    tokio::spawn(async move { audit.record(event).await });

    next.run(request).await
}
