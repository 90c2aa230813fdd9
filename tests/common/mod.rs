#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, Response};
use serde_json::{json, Value};
use tempfile::TempDir;

use dealership_api::audit::AuditLog;
use dealership_api::auth::{Credentials, TokenKeys};
use dealership_api::database::{MemoryStore, Store};
use dealership_api::{app, AppState};

pub const SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub token: String,
    pub audit_log: AuditLog,
    _audit_dir: TempDir,
}

impl TestServer {
    /// Server backed by a fresh in-memory store.
    pub async fn start() -> Result<Self> {
        Self::start_with(Arc::new(MemoryStore::new()), Duration::from_secs(5)).await
    }

    pub async fn start_with(store: Arc<dyn Store>, query_timeout: Duration) -> Result<Self> {
        let audit_dir = tempfile::tempdir().context("failed to create audit dir")?;
        let audit_log = AuditLog::in_dir(audit_dir.path());
        let tokens = TokenKeys::new(SECRET);
        let token = tokens.issue_token(&Credentials::default())?;

        let state = AppState::new(store, tokens, audit_log.clone(), query_timeout);

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        let router = app(state, true);
        tokio::spawn(async move {
            let _ = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
            token,
            audit_log,
            _audit_dir: audit_dir,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request carrying the bearer token.
    pub fn authed(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(&self.token)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.authed(reqwest::Method::GET, path).send().await?)
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Response> {
        Ok(self.authed(reqwest::Method::POST, path).json(&body).send().await?)
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Response> {
        Ok(self.authed(reqwest::Method::PUT, path).json(&body).send().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        Ok(self.authed(reqwest::Method::DELETE, path).send().await?)
    }

    pub async fn create_dealership(&self, name: &str) -> Result<i64> {
        let res = self.post("/dealerships", json!({ "name": name })).await?;
        anyhow::ensure!(res.status().is_success(), "create dealership failed: {}", res.status());
        created_id(res).await
    }

    pub async fn create_car(&self, dealership_id: i64, make: &str, model: &str) -> Result<i64> {
        let res = self
            .post(
                &format!("/dealerships/{}/cars", dealership_id),
                json!({ "make": make, "model": model }),
            )
            .await?;
        anyhow::ensure!(res.status().is_success(), "create car failed: {}", res.status());
        created_id(res).await
    }

    pub async fn audit_lines(&self) -> Result<Vec<String>> {
        let contents = tokio::fs::read_to_string(self.audit_log.path())
            .await
            .unwrap_or_default();
        Ok(contents.lines().map(str::to_string).collect())
    }

    /// Request lines are written off the request path, so poll until one
    /// matches (or give up after a second and return what is there).
    pub async fn audit_lines_until(&self, matches: impl Fn(&str) -> bool) -> Result<Vec<String>> {
        for _ in 0..50 {
            let lines = self.audit_lines().await?;
            if lines.iter().any(|l| matches(l)) {
                return Ok(lines);
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.audit_lines().await
    }
}

pub async fn created_id(res: Response) -> Result<i64> {
    let body = res.json::<Value>().await?;
    body["id"]
        .as_i64()
        .with_context(|| format!("missing id in {}", body))
}
