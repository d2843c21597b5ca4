use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::schema::ColumnPolicy;
use crate::state::AppState;

/// GET / - Service information
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "name": "Material Catalog API",
        "version": env!("CARGO_PKG_VERSION"),
        "schema": {
            "table": state.registry.table(),
            "version": state.registry.version(),
            "columns": state.registry.columns().len()
        },
        "endpoints": {
            "list": "GET /api/materials?limit=&offset= (public)",
            "create": "POST /api/materials (x-admin-token)",
            "update": "PUT /api/materials[?id=] (x-admin-token)",
            "delete": "DELETE /api/materials?id= (x-admin-token)",
            "health": "GET /health (public)"
        }
    }))
}

/// GET /health - Storage probe
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let probe = match state.store() {
        Ok(store) => store.table_exists().await.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match probe {
        Ok(table_exists) => {
            let status = if table_exists { "ok" } else { "degraded" };
            (
                StatusCode::OK,
                Json(json!({
                    "ok": true,
                    "status": status,
                    "timestamp": now,
                    "database": "ok",
                    "table_exists": table_exists
                })),
            )
        }
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "ok": false,
                "error": "database unavailable",
                "status": "degraded",
                "timestamp": now,
                "database_error": e
            })),
        ),
    }
}
