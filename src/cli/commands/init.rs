use anyhow::Context;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::config;
use crate::database::{DatabaseManager, MaterialStore, SqliteStore};
use crate::schema::{ColumnPolicy, SchemaRegistry};

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config::config();
    let registry = SchemaRegistry::materials()?;

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open database")?;
    let store = SqliteStore::new(registry.table(), pool);

    let existed = store.table_exists().await?;
    store.create_table(&registry).await?;

    match output_format {
        OutputFormat::Json => {
            let out = json!({
                "table": registry.table(),
                "columns": registry.columns().len(),
                "created": !existed
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            if existed {
                println!("Table '{}' already exists", registry.table());
            } else {
                println!(
                    "Created table '{}' with {} columns",
                    registry.table(),
                    registry.columns().len()
                );
            }
        }
    }

    Ok(())
}
