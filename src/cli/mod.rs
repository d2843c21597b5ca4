pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "materials")]
#[command(about = "Materials catalog - server and schema management")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP API")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides MATERIALS_API_PORT/PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Create the materials table if it does not exist")]
    Init,

    #[command(about = "List the columns known to the schema registry")]
    Columns {
        #[arg(long, value_enum, default_value_t = commands::columns::ColumnKind::All)]
        kind: commands::columns::ColumnKind,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Serve { port } => commands::serve::handle(port).await,
        Commands::Init => commands::init::handle(output_format).await,
        Commands::Columns { kind } => commands::columns::handle(kind, output_format),
    }
}
