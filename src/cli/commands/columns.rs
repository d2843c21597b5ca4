use clap::ValueEnum;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::schema::{ColumnPolicy, SchemaRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColumnKind {
    All,
    Array,
    Boolean,
}

pub fn select(registry: &SchemaRegistry, kind: ColumnKind) -> Vec<&'static str> {
    match kind {
        ColumnKind::All => registry.columns().to_vec(),
        ColumnKind::Array => registry.array_columns(),
        ColumnKind::Boolean => registry.boolean_columns(),
    }
}

pub fn handle(kind: ColumnKind, output_format: OutputFormat) -> anyhow::Result<()> {
    let registry = SchemaRegistry::materials()?;
    let columns = select(&registry, kind);

    match output_format {
        OutputFormat::Json => {
            let out = json!({
                "table": registry.table(),
                "version": registry.version(),
                "columns": columns
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            for column in columns {
                let tag = if registry.is_array_column(column) {
                    " [array]"
                } else if registry.is_boolean_column(column) {
                    " [boolean]"
                } else {
                    ""
                };
                println!("{}{}", column, tag);
            }
        }
    }

    Ok(())
}
