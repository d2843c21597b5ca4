use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::schema::ColumnPolicy;

/// Validation failures while turning a client field map into a statement
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MutationError {
    #[error("Missing id")]
    MissingIdentifier,

    #[error("No updatable fields provided")]
    NoUpdatableFields,

    #[error("Invalid JSON body")]
    InvalidBody,
}

/// Parameterized SQL plus its positional values
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub query: String,
    pub params: Vec<Value>,
}

/// Client input reduced to whitelisted columns with storage-ready values.
///
/// Keys are the registry's own column names, so anything rendered from
/// this map into SQL text comes from the closed whitelist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WritableRecord {
    fields: BTreeMap<&'static str, Value>,
}

impl WritableRecord {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.fields.remove(column)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertPlan {
    pub columns: Vec<&'static str>,
    pub placeholders: String,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePlan {
    pub set_clause: String,
    /// SET values in clause order, followed by the id for `WHERE id = ?`
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeletePlan {
    pub id: Value,
}

/// Builds insert/update/delete statements for one table under a column policy
pub struct MutationBuilder<'a> {
    policy: &'a dyn ColumnPolicy,
}

impl<'a> MutationBuilder<'a> {
    pub fn new(policy: &'a dyn ColumnPolicy) -> Self {
        Self { policy }
    }

    /// Keep only whitelisted keys, encoding array columns for storage.
    /// Unknown keys are dropped without error.
    pub fn project_writable(&self, input: &Map<String, Value>) -> WritableRecord {
        let mut fields = BTreeMap::new();

        for (key, value) in input {
            let Some(column) = self.policy.canonical(key) else {
                tracing::debug!("Dropping non-writable field '{}'", key);
                continue;
            };

            let value = match value {
                Value::Array(_) if self.policy.is_array_column(column) => {
                    Value::String(value.to_string())
                }
                Value::String(s) if s.is_empty() => Value::Null,
                other => other.clone(),
            };
            fields.insert(column, value);
        }

        WritableRecord { fields }
    }

    pub fn build_insert(&self, record: &WritableRecord) -> Result<InsertPlan, MutationError> {
        if record.is_empty() || !record.get("id").is_some_and(is_present_id) {
            return Err(MutationError::MissingIdentifier);
        }

        let columns: Vec<&'static str> = record.columns().collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let values = record.fields.values().cloned().collect();

        Ok(InsertPlan { columns, placeholders, values })
    }

    pub fn build_update(
        &self,
        id: &Value,
        mut record: WritableRecord,
    ) -> Result<UpdatePlan, MutationError> {
        if !is_present_id(id) {
            return Err(MutationError::MissingIdentifier);
        }

        record.remove("id");
        if record.is_empty() {
            return Err(MutationError::NoUpdatableFields);
        }

        let set_clause = record
            .columns()
            .map(|column| format!("{} = ?", quote_identifier(column)))
            .collect::<Vec<_>>()
            .join(", ");

        let mut values: Vec<Value> = record.fields.into_values().collect();
        values.push(id.clone());

        Ok(UpdatePlan { set_clause, values })
    }

    pub fn build_delete(&self, id: Option<&Value>) -> Result<DeletePlan, MutationError> {
        match id {
            Some(id) if is_present_id(id) => Ok(DeletePlan { id: id.clone() }),
            _ => Err(MutationError::MissingIdentifier),
        }
    }

    pub fn insert_statement(&self, plan: InsertPlan) -> SqlStatement {
        let column_list = plan
            .columns
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ");

        SqlStatement {
            query: format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_identifier(self.policy.table()),
                column_list,
                plan.placeholders
            ),
            params: plan.values,
        }
    }

    pub fn update_statement(&self, plan: UpdatePlan) -> SqlStatement {
        SqlStatement {
            query: format!(
                "UPDATE {} SET {} WHERE \"id\" = ?",
                quote_identifier(self.policy.table()),
                plan.set_clause
            ),
            params: plan.values,
        }
    }

    pub fn delete_statement(&self, plan: DeletePlan) -> SqlStatement {
        SqlStatement {
            query: format!(
                "DELETE FROM {} WHERE \"id\" = ?",
                quote_identifier(self.policy.table())
            ),
            params: vec![plan.id],
        }
    }
}

/// An id is usable when it is a number or a non-blank string
pub fn is_present_id(id: &Value) -> bool {
    match id {
        Value::String(s) => !s.trim().is_empty(),
        Value::Number(_) => true,
        _ => false,
    }
}

/// Quote SQL identifier. Callers only pass whitelist entries.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaRegistry;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::materials().unwrap()
    }

    fn input(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("input must be an object"),
        }
    }

    #[test]
    fn projection_drops_unknown_keys() {
        let registry = registry();
        let builder = MutationBuilder::new(&registry);
        let record = builder.project_writable(&input(json!({
            "id": "x",
            "evil_column": "DROP TABLE",
            "name\" = 1; --": "boom"
        })));

        assert_eq!(record.len(), 1);
        assert_eq!(record.get("id"), Some(&json!("x")));
        assert_eq!(record.get("evil_column"), None);
    }

    #[test]
    fn projection_encodes_arrays_and_blanks() {
        let registry = registry();
        let builder = MutationBuilder::new(&registry);
        let record = builder.project_writable(&input(json!({
            "id": "x",
            "use_cases": ["banner", "event"],
            "notes": "",
            "thickness": 0.5,
            "indoor_use": true,
            "sign_types": "already-text"
        })));

        assert_eq!(record.get("use_cases"), Some(&json!(r#"["banner","event"]"#)));
        assert_eq!(record.get("notes"), Some(&Value::Null));
        assert_eq!(record.get("thickness"), Some(&json!(0.5)));
        assert_eq!(record.get("indoor_use"), Some(&json!(true)));
        assert_eq!(record.get("sign_types"), Some(&json!("already-text")));
    }

    #[test]
    fn projection_leaves_arrays_on_scalar_columns_alone() {
        let registry = registry();
        let builder = MutationBuilder::new(&registry);
        let record = builder.project_writable(&input(json!({ "notes": ["a"] })));
        assert_eq!(record.get("notes"), Some(&json!(["a"])));
    }

    #[test]
    fn insert_requires_id() {
        let registry = registry();
        let builder = MutationBuilder::new(&registry);

        let empty = builder.project_writable(&input(json!({ "evil": 1 })));
        assert_eq!(builder.build_insert(&empty), Err(MutationError::MissingIdentifier));

        let no_id = builder.project_writable(&input(json!({ "name": "Vinyl" })));
        assert_eq!(builder.build_insert(&no_id), Err(MutationError::MissingIdentifier));

        let blank_id = builder.project_writable(&input(json!({ "id": "", "name": "Vinyl" })));
        assert_eq!(builder.build_insert(&blank_id), Err(MutationError::MissingIdentifier));
    }

    #[test]
    fn insert_renders_whitelisted_columns_in_stable_order() {
        let registry = registry();
        let builder = MutationBuilder::new(&registry);
        let record = builder.project_writable(&input(json!({
            "name": "Coroplast 4mm",
            "id": "coro-4mm",
            "use_cases": ["yard"],
            "bogus": "x"
        })));

        let plan = builder.build_insert(&record).unwrap();
        assert_eq!(plan.columns, vec!["id", "name", "use_cases"]);
        assert_eq!(plan.placeholders, "?, ?, ?");
        assert_eq!(
            plan.values,
            vec![json!("coro-4mm"), json!("Coroplast 4mm"), json!(r#"["yard"]"#)]
        );

        let stmt = builder.insert_statement(plan);
        assert_eq!(
            stmt.query,
            r#"INSERT INTO "materials" ("id", "name", "use_cases") VALUES (?, ?, ?)"#
        );
        assert_eq!(stmt.params.len(), 3);
    }

    #[test]
    fn update_strips_id_and_appends_it_last() {
        let registry = registry();
        let builder = MutationBuilder::new(&registry);
        let record = builder.project_writable(&input(json!({
            "id": "ignored-body-id",
            "name": "Renamed",
            "can_sew": "y"
        })));

        let plan = builder.build_update(&json!("coro-4mm"), record).unwrap();
        assert_eq!(plan.set_clause, r#""can_sew" = ?, "name" = ?"#);
        assert_eq!(plan.values, vec![json!("y"), json!("Renamed"), json!("coro-4mm")]);

        let stmt = builder.update_statement(plan);
        assert_eq!(
            stmt.query,
            r#"UPDATE "materials" SET "can_sew" = ?, "name" = ? WHERE "id" = ?"#
        );
    }

    #[test]
    fn update_without_fields_fails() {
        let registry = registry();
        let builder = MutationBuilder::new(&registry);

        let record = builder.project_writable(&input(json!({})));
        assert_eq!(
            builder.build_update(&json!("x"), record),
            Err(MutationError::NoUpdatableFields)
        );

        let only_id = builder.project_writable(&input(json!({ "id": "x", "evil": 1 })));
        assert_eq!(
            builder.build_update(&json!("x"), only_id),
            Err(MutationError::NoUpdatableFields)
        );
    }

    #[test]
    fn update_requires_id() {
        let registry = registry();
        let builder = MutationBuilder::new(&registry);
        let record = builder.project_writable(&input(json!({ "name": "x" })));
        assert_eq!(
            builder.build_update(&Value::Null, record),
            Err(MutationError::MissingIdentifier)
        );
    }

    #[test]
    fn delete_requires_id() {
        let registry = registry();
        let builder = MutationBuilder::new(&registry);

        assert_eq!(builder.build_delete(None), Err(MutationError::MissingIdentifier));
        assert_eq!(builder.build_delete(Some(&json!(""))), Err(MutationError::MissingIdentifier));
        assert_eq!(builder.build_delete(Some(&json!(true))), Err(MutationError::MissingIdentifier));

        let plan = builder.build_delete(Some(&json!(12))).unwrap();
        let stmt = builder.delete_statement(plan);
        assert_eq!(stmt.query, r#"DELETE FROM "materials" WHERE "id" = ?"#);
        assert_eq!(stmt.params, vec![json!(12)]);
    }

    #[test]
    fn numeric_zero_is_a_valid_id() {
        assert!(is_present_id(&json!(0)));
        assert!(!is_present_id(&json!("  ")));
        assert!(!is_present_id(&json!({ "id": 1 })));
    }

    #[test]
    fn stored_values_decode_back_to_input() {
        use crate::database::record::RecordCodec;
        use std::sync::Arc;

        let registry = Arc::new(registry());
        let builder = MutationBuilder::new(registry.as_ref());
        let codec = RecordCodec::new(registry.clone());

        let original = json!({
            "id": "pvc-3mm",
            "use_cases": ["menu board", "it's quoted"],
            "install_methods": [],
            "indoor_use": true,
            "outdoor_use": false
        });
        let projected = builder.project_writable(&input(original.clone()));

        let stored: Map<String, Value> = projected
            .columns()
            .map(|c| (c.to_string(), projected.get(c).cloned().unwrap_or(Value::Null)))
            .collect();
        let decoded = codec.decode(stored);

        assert_eq!(serde_json::to_value(&decoded).unwrap(), original);
    }
}
