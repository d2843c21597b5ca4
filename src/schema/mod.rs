pub mod materials;

use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while assembling a schema registry
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Invalid column name: {0}")]
    InvalidColumn(String),

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Column '{0}' is classified but not writable")]
    UnlistedColumn(String),

    #[error("Writable columns must include 'id'")]
    MissingIdColumn,
}

/// Column classification consulted by the record codec and mutation builder.
///
/// `canonical` is the only way a column name reaches SQL text: it returns the
/// registry's own `&'static str`, never the caller's string.
pub trait ColumnPolicy: Send + Sync {
    fn table(&self) -> &'static str;
    fn columns(&self) -> &[&'static str];
    fn canonical(&self, column: &str) -> Option<&'static str>;
    fn is_array_column(&self, column: &str) -> bool;
    fn is_boolean_column(&self, column: &str) -> bool;

    fn is_writable(&self, column: &str) -> bool {
        self.canonical(column).is_some()
    }
}

/// Immutable description of a single table's writable shape
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    table: &'static str,
    version: u32,
    writable: Vec<&'static str>,
    writable_set: HashSet<&'static str>,
    array_columns: HashSet<&'static str>,
    boolean_columns: HashSet<&'static str>,
}

impl SchemaRegistry {
    pub const MATERIALS_VERSION: u32 = 1;

    /// Build a registry, checking that every classified column is also writable.
    pub fn new(
        table: &'static str,
        version: u32,
        writable: &[&'static str],
        array_columns: &[&'static str],
        boolean_columns: &[&'static str],
    ) -> Result<Self, SchemaError> {
        if !is_valid_identifier(table) {
            return Err(SchemaError::InvalidColumn(table.to_string()));
        }

        let mut writable_set = HashSet::with_capacity(writable.len());
        for &column in writable {
            if !is_valid_identifier(column) {
                return Err(SchemaError::InvalidColumn(column.to_string()));
            }
            if !writable_set.insert(column) {
                return Err(SchemaError::DuplicateColumn(column.to_string()));
            }
        }
        if !writable_set.contains("id") {
            return Err(SchemaError::MissingIdColumn);
        }

        for &column in array_columns.iter().chain(boolean_columns) {
            if !writable_set.contains(column) {
                return Err(SchemaError::UnlistedColumn(column.to_string()));
            }
        }

        Ok(Self {
            table,
            version,
            writable: writable.to_vec(),
            writable_set,
            array_columns: array_columns.iter().copied().collect(),
            boolean_columns: boolean_columns.iter().copied().collect(),
        })
    }

    /// Registry for the `materials` table
    pub fn materials() -> Result<Self, SchemaError> {
        Self::new(
            "materials",
            Self::MATERIALS_VERSION,
            materials::WRITABLE_COLUMNS,
            materials::ARRAY_COLUMNS,
            materials::BOOLEAN_COLUMNS,
        )
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn array_columns(&self) -> Vec<&'static str> {
        self.writable
            .iter()
            .copied()
            .filter(|c| self.array_columns.contains(c))
            .collect()
    }

    pub fn boolean_columns(&self) -> Vec<&'static str> {
        self.writable
            .iter()
            .copied()
            .filter(|c| self.boolean_columns.contains(c))
            .collect()
    }
}

impl ColumnPolicy for SchemaRegistry {
    fn table(&self) -> &'static str {
        self.table
    }

    fn columns(&self) -> &[&'static str] {
        &self.writable
    }

    fn canonical(&self, column: &str) -> Option<&'static str> {
        self.writable_set.get(column).copied()
    }

    fn is_array_column(&self, column: &str) -> bool {
        self.array_columns.contains(column)
    }

    fn is_boolean_column(&self, column: &str) -> bool {
        self.boolean_columns.contains(column)
    }
}

/// Lowercase ASCII letters, digits and underscores, not starting with a digit
fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
