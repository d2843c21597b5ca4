use async_trait::async_trait;
use serde_json::{Map, Number, Value};
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqliteRow};
use sqlx::{Column, Row, Sqlite, TypeInfo, ValueRef};

use crate::database::manager::DatabaseError;
use crate::database::mutation::SqlStatement;
use crate::schema::ColumnPolicy;

/// Storage collaborator for the materials table.
///
/// One call is one round trip; nothing here retries or spans a transaction.
#[async_trait]
pub trait MaterialStore: Send + Sync {
    /// Existence probe for the backing table
    async fn table_exists(&self) -> Result<bool, DatabaseError>;

    async fn count(&self) -> Result<i64, DatabaseError>;

    /// Raw rows ordered by id
    async fn select_page(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Map<String, Value>>, DatabaseError>;

    /// Run a mutation and report the affected row count
    async fn execute(&self, statement: &SqlStatement) -> Result<u64, DatabaseError>;
}

pub struct SqliteStore {
    table: &'static str,
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(table: &'static str, pool: SqlitePool) -> Self {
        Self { table, pool }
    }

    /// Create the table from the registry if it is missing. Columns are left
    /// untyped so legacy values keep whatever storage class they were written with.
    pub async fn create_table(&self, policy: &dyn ColumnPolicy) -> Result<(), DatabaseError> {
        let ddl = create_table_sql(policy);
        tracing::debug!("Creating table: {}", ddl);
        sqlx::query(&ddl).execute(&self.pool).await?;
        tracing::info!("Ensured table '{}' ({} columns)", policy.table(), policy.columns().len());
        Ok(())
    }
}

#[async_trait]
impl MaterialStore for SqliteStore {
    async fn table_exists(&self) -> Result<bool, DatabaseError> {
        let row = sqlx::query("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ? LIMIT 1")
            .bind(self.table)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        let query = format!("SELECT COUNT(*) AS count FROM \"{}\"", self.table);
        let row = sqlx::query(&query).fetch_one(&self.pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    async fn select_page(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Map<String, Value>>, DatabaseError> {
        let query = format!(
            "SELECT * FROM \"{}\" ORDER BY \"id\" LIMIT ? OFFSET ?",
            self.table
        );
        let rows = sqlx::query(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(row_to_map).collect())
    }

    async fn execute(&self, statement: &SqlStatement) -> Result<u64, DatabaseError> {
        tracing::debug!("Executing: {} ({} params)", statement.query, statement.params.len());

        let mut q = sqlx::query(&statement.query);
        for param in &statement.params {
            q = bind_param(q, param);
        }
        let result = q.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

pub fn create_table_sql(policy: &dyn ColumnPolicy) -> String {
    let columns = policy
        .columns()
        .iter()
        .map(|&column| {
            if column == "id" {
                "\"id\" PRIMARY KEY NOT NULL".to_string()
            } else {
                format!("\"{}\"", column)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("CREATE TABLE IF NOT EXISTS \"{}\" ({})", policy.table(), columns)
}

fn bind_param<'q>(
    q: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
    v: &Value,
) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if n.is_u64() {
                // Above i64::MAX; REAL would lose digits
                q.bind(n.to_string())
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.clone()),
        // Nested values that reach storage unencoded are stored as JSON text
        Value::Array(_) | Value::Object(_) => q.bind(v.to_string()),
    }
}

/// Convert a row by the storage class of each value, not the declared column type
fn row_to_map(row: &SqliteRow) -> Map<String, Value> {
    let mut map = Map::new();

    for (i, column) in row.columns().iter().enumerate() {
        let storage_class = match row.try_get_raw(i) {
            Ok(raw) if raw.is_null() => None,
            Ok(raw) => Some(raw.type_info().name().to_string()),
            Err(_) => None,
        };

        let value = match storage_class.as_deref() {
            None => Value::Null,
            Some("INTEGER") => row.try_get::<i64, _>(i).map(Value::from).unwrap_or(Value::Null),
            Some("REAL") => row
                .try_get::<f64, _>(i)
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Some("BOOLEAN") => row.try_get::<bool, _>(i).map(Value::Bool).unwrap_or(Value::Null),
            Some("BLOB") => row
                .try_get::<Vec<u8>, _>(i)
                .map(|bytes| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
                .unwrap_or(Value::Null),
            Some(_) => row.try_get::<String, _>(i).map(Value::String).unwrap_or(Value::Null),
        };

        map.insert(column.name().to_string(), value);
    }

    map
}
