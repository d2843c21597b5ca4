use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::database::mutation::is_present_id;
use crate::database::{DatabaseError, MaterialRecord, MutationError};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::schema::ColumnPolicy;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Page size; defaults to 250, clamped to 1..=1000
    pub limit: Option<String>,
    /// Rows to skip; negative values become 0
    pub offset: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MaterialList {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub returned: usize,
    pub materials: Vec<MaterialRecord>,
}

/// GET /api/materials - Paginated public listing
pub async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> ApiResult<MaterialList> {
    let (limit, offset) = state
        .pagination
        .resolve(query.limit.as_deref(), query.offset.as_deref());

    let store = state.store()?;
    if !store.table_exists().await? {
        return Err(DatabaseError::MissingTable(state.registry.table()).into());
    }

    let total = store.count().await?;
    let rows = store.select_page(limit, offset).await?;
    let materials = state.codec.decode_all(rows);

    Ok(ApiResponse::success(MaterialList {
        total,
        limit,
        offset,
        returned: materials.len(),
        materials,
    }))
}

/// POST /api/materials - Insert a material (admin)
pub async fn create(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Value> {
    let input = parse_object(&read_body(body)?).ok_or(MutationError::InvalidBody)?;

    let builder = state.builder();
    let record = builder.project_writable(&input);
    let statement = builder.insert_statement(builder.build_insert(&record)?);

    state.store()?.execute(&statement).await?;
    let inserted_id = record.get("id").map(|v| v.to_string()).unwrap_or_default();
    tracing::info!("Inserted material {}", inserted_id);

    Ok(ApiResponse::ok())
}

/// PUT /api/materials - Partial update by id (admin). The body id wins over `?id=`.
pub async fn update(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Value> {
    let input = parse_object(&read_body(body)?).ok_or(MutationError::InvalidBody)?;

    let id = input
        .get("id")
        .filter(|v| is_present_id(v))
        .cloned()
        .or_else(|| query_id(&query))
        .ok_or(MutationError::MissingIdentifier)?;

    let builder = state.builder();
    let record = builder.project_writable(&input);
    let statement = builder.update_statement(builder.build_update(&id, record)?);

    let changed = state.store()?.execute(&statement).await?;
    tracing::info!("Updated material {} ({} row(s))", id, changed);

    Ok(ApiResponse::success(json!({ "changed": changed })))
}

/// DELETE /api/materials - Delete by id (admin). `?id=` wins over a body id;
/// the body is optional and ignored when it is not a JSON object.
pub async fn remove(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Value> {
    let id = match query_id(&query) {
        Some(id) => Some(id),
        None => parse_object(&read_body(body)?).and_then(|mut input| input.remove("id")),
    };

    let builder = state.builder();
    let statement = builder.delete_statement(builder.build_delete(id.as_ref())?);

    let changed = state.store()?.execute(&statement).await?;
    tracing::info!("Deleted material {} ({} row(s))", statement.params[0], changed);

    Ok(ApiResponse::success(json!({ "changed": changed })))
}

/// Any other verb on /api/materials
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
    body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large(rejection.body_text())
        } else {
            ApiError::bad_request(rejection.body_text())
        }
    })
}

/// A JSON object body, or None for anything else (empty, malformed, array, scalar)
fn parse_object(body: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn query_id(query: &IdQuery) -> Option<Value> {
    query
        .id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| Value::String(s.to_string()))
}
