#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::{Map, Value};
use tower::ServiceExt;

use material_catalog::database::{
    DatabaseError, DatabaseManager, MaterialStore, SqlStatement, SqliteStore,
};
use material_catalog::middleware::ADMIN_TOKEN_HEADER;
use material_catalog::schema::{ColumnPolicy, SchemaRegistry};
use material_catalog::{app, AppState, Pagination};

pub const TOKEN: &str = "test-admin-token";

/// Store that records every call and answers from canned data
#[derive(Default)]
pub struct SpyStore {
    calls: Mutex<Vec<String>>,
    pub rows: Vec<Map<String, Value>>,
    pub missing_table: bool,
    pub changes: u64,
}

impl SpyStore {
    pub fn with_rows(rows: Vec<Value>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .filter_map(|v| match v {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
            changes: 1,
            ..Default::default()
        }
    }

    pub fn without_table() -> Self {
        Self {
            missing_table: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MaterialStore for SpyStore {
    async fn table_exists(&self) -> Result<bool, DatabaseError> {
        self.record("table_exists".to_string());
        Ok(!self.missing_table)
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        self.record("count".to_string());
        Ok(self.rows.len() as i64)
    }

    async fn select_page(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Map<String, Value>>, DatabaseError> {
        self.record(format!("select_page({}, {})", limit, offset));
        Ok(self
            .rows
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn execute(&self, statement: &SqlStatement) -> Result<u64, DatabaseError> {
        self.record(format!("execute({})", statement.query));
        Ok(self.changes)
    }
}

pub fn registry() -> Arc<SchemaRegistry> {
    Arc::new(SchemaRegistry::materials().expect("materials registry"))
}

pub fn spy_app(spy: Arc<SpyStore>, token: Option<&str>) -> Router {
    let store: Arc<dyn MaterialStore> = spy;
    app(AppState::new(registry(), Some(store), token, Pagination::default()))
}

/// In-memory SQLite with the materials table created
pub async fn sqlite_app() -> Result<Router> {
    let registry = registry();
    let pool = DatabaseManager::connect_in_memory().await?;
    let store = SqliteStore::new(registry.table(), pool);
    store.create_table(registry.as_ref()).await?;

    let store: Arc<dyn MaterialStore> = Arc::new(store);
    Ok(app(AppState::new(registry, Some(store), Some(TOKEN), Pagination::default())))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&str>,
) -> Result<TestResponse> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(ADMIN_TOKEN_HEADER, token);
    }
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder.body(Body::from(body.unwrap_or_default().to_string()))?;

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok(TestResponse { status, headers, body })
}
