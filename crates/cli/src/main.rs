//! Minha API CLI - Management commands.
//!
//! # Usage
//!
//! ```bash
//! # Print the OpenAPI document as JSON
//! minha-cli schema
//!
//! # Write the OpenAPI document as YAML
//! minha-cli schema --format yaml --output openapi.yaml
//!
//! # List the route table
//! minha-cli routes
//! ```
//!
//! # Commands
//!
//! - `schema` - Generate the OpenAPI document offline
//! - `routes` - Print the route table in declaration order

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;

use commands::schema::SchemaFormat;

#[derive(Parser)]
#[command(name = "minha-cli")]
#[command(author, version, about = "Minha API management commands")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the OpenAPI document from the route table
    Schema {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = SchemaFormat::Json)]
        format: SchemaFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the route table
    Routes,
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays clean for command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minha_api_cli=info,minha_api_server=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let config = commands::load_config()?;

    match cli.command {
        Commands::Schema { format, output } => {
            commands::schema::export(&config, format, output.as_deref())
        }
        Commands::Routes => commands::routes::list(&config, &mut std::io::stdout().lock()),
    }
}
