use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, SecurityConfig};
use crate::database::{DatabaseManager, MaterialStore, SqliteStore};
use crate::handlers::{health, materials};
use crate::middleware::{require_admin, ADMIN_TOKEN_HEADER};
use crate::schema::{ColumnPolicy, SchemaRegistry};
use crate::state::{AppState, Pagination};

/// Routes plus the layers every response needs. Reads are public; writes
/// pass through the admin gate before their handlers run.
pub fn app(state: AppState) -> Router {
    let admin = post(materials::create)
        .put(materials::update)
        .delete(materials::remove)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route(
            "/api/materials",
            get(materials::list)
                .merge(admin)
                .fallback(materials::method_not_allowed),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}

/// Build the shared state from configuration. A missing `DATABASE_URL` is not
/// fatal here: data routes report it per request.
pub async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let registry = Arc::new(SchemaRegistry::materials()?);

    let store: Option<Arc<dyn MaterialStore>> = match config.database.url {
        Some(_) => {
            let pool = DatabaseManager::connect(&config.database).await?;
            Some(Arc::new(SqliteStore::new(registry.table(), pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; /api/materials will answer 500");
            None
        }
    };

    if config.security.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN is not set; admin writes will answer 500");
    }

    Ok(AppState::new(
        registry,
        store,
        config.security.admin_token.as_deref(),
        Pagination::from(&config.api),
    ))
}

pub fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(ADMIN_TOKEN_HEADER)]),
    )
}

pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let state = build_state(config).await?;

    let mut router = app(state).layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));
    if let Some(cors) = cors_layer(&config.security) {
        router = router.layer(cors);
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Material catalog API listening on http://{}", bind_addr);

    axum::serve(listener, router).await?;
    Ok(())
}

/// `RUST_LOG` filter, defaulting to `info`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
