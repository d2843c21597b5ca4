use std::sync::Arc;

use crate::config::ApiConfig;
use crate::database::{DatabaseError, MaterialStore, MutationBuilder, RecordCodec};
use crate::error::ApiError;
use crate::middleware::AdminGate;
use crate::schema::{ColumnPolicy, SchemaRegistry};

/// Listing bounds applied to `limit`/`offset` query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Pagination {
    /// Missing or unparsable values fall back to the defaults
    pub fn resolve(&self, limit: Option<&str>, offset: Option<&str>) -> (i64, i64) {
        let limit = limit
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit);
        let offset = offset
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(0)
            .max(0);
        (limit, offset)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            default_limit: 250,
            max_limit: 1000,
        }
    }
}

impl From<&ApiConfig> for Pagination {
    fn from(api: &ApiConfig) -> Self {
        Self {
            default_limit: api.default_limit,
            max_limit: api.max_limit,
        }
    }
}

/// Request-independent state shared by every handler. Nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SchemaRegistry>,
    pub codec: RecordCodec,
    pub store: Option<Arc<dyn MaterialStore>>,
    pub gate: AdminGate,
    pub pagination: Pagination,
}

impl AppState {
    pub fn new(
        registry: Arc<SchemaRegistry>,
        store: Option<Arc<dyn MaterialStore>>,
        admin_token: Option<&str>,
        pagination: Pagination,
    ) -> Self {
        Self {
            codec: RecordCodec::new(registry.clone()),
            registry,
            store,
            gate: AdminGate::new(admin_token),
            pagination,
        }
    }

    pub fn store(&self) -> Result<&dyn MaterialStore, ApiError> {
        self.store
            .as_deref()
            .ok_or_else(|| DatabaseError::ConfigMissing("DATABASE_URL").into())
    }

    pub fn builder(&self) -> MutationBuilder<'_> {
        MutationBuilder::new(self.registry.as_ref() as &dyn ColumnPolicy)
    }
}
