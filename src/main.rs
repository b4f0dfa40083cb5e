mod commands;
mod config;
mod database;
mod model;
mod results;

use crate::commands::{CommandResult, OutputFormat};
use crate::config::{DatabaseConfig, DEFAULT_MAX_CONNECTIONS};
use crate::database::ResultsDatabase;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(version, about = "Turnout and vote-share results by department, municipality and party")]
struct Opts {
    /// SQLite database URL (e.g. "sqlite:escrutinio.db")
    #[clap(long, env = "DATABASE_URL")]
    database_url: String,
    /// Maximum number of pooled connections
    #[clap(long, env = "ESCRUTINIO_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    max_connections: u32,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load an election snapshot (JSON) into the database, creating the schema if needed.
    Load {
        /// Snapshot file
        snapshot: PathBuf,
        /// Remove all existing rows before loading
        #[clap(long)]
        replace: bool,
    },
    /// Check that the database has the expected tables.
    Verify,
    /// Compute results for a department, municipality and party.
    Results {
        #[clap(long)]
        department: String,
        #[clap(long)]
        municipality: String,
        #[clap(long)]
        party: String,
        /// Pretty-print the JSON output
        #[clap(long)]
        pretty: bool,
        /// Print a human-readable table instead of JSON
        #[clap(long, conflicts_with = "pretty")]
        table: bool,
    },
    /// List departments.
    Departments,
    /// List the municipalities of a department.
    Municipalities {
        #[clap(long)]
        department: String,
    },
    /// List parties.
    Parties,
}

#[tokio::main]
async fn main() {
    // Optional .env next to the binary's working directory
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let opts = Opts::parse();

    let config = DatabaseConfig::new(opts.database_url)
        .with_max_connections(opts.max_connections)
        .with_create_if_missing(matches!(opts.command, Command::Load { .. }));

    if let Err(e) = run(&config, opts.command).await {
        eprintln!("{} {}", "❌".red(), e);
        std::process::exit(e.exit_code());
    }
}

async fn run(config: &DatabaseConfig, command: Command) -> CommandResult<()> {
    let db = ResultsDatabase::connect(config).await?;

    match command {
        Command::Load { snapshot, replace } => commands::load(db, &snapshot, replace).await,
        Command::Verify => commands::verify(db).await,
        Command::Results {
            department,
            municipality,
            party,
            pretty,
            table,
        } => {
            let format = if table {
                OutputFormat::Table
            } else if pretty {
                OutputFormat::PrettyJson
            } else {
                OutputFormat::Json
            };
            commands::results(db, &department, &municipality, &party, format).await
        }
        Command::Departments => commands::departments(db).await,
        Command::Municipalities { department } => {
            commands::municipalities(db, &department).await
        }
        Command::Parties => commands::parties(db).await,
    }
}
