use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::audit::AuditLog;
use crate::auth::TokenKeys;
use crate::database::{DatabaseError, Store};

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cloning is cheap; everything heavy sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenKeys>,
    pub audit: AuditLog,
    /// Deadline applied to each store call made on behalf of a request.
    pub query_timeout: Duration,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        tokens: TokenKeys,
        audit: AuditLog,
        query_timeout: Duration,
    ) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            audit,
            query_timeout,
        }
    }

    /// Await a store call, failing with [`DatabaseError::Timeout`] once the
    /// deadline passes.
    pub async fn store_call<T, F>(&self, call: F) -> Result<T, DatabaseError>
    where
        F: Future<Output = Result<T, DatabaseError>>,
    {
        tokio::time::timeout(self.query_timeout, call)
            .await
            .map_err(|_| DatabaseError::Timeout(self.query_timeout))?
    }
}
