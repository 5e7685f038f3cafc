// ABOUTME: CLI entry point for track-etl
// ABOUTME: Parses commands and routes to appropriate handlers

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use track_etl::{commands, loader::DEFAULT_BATCH_SIZE, migration::Source};

#[derive(Parser)]
#[command(name = "track-etl")]
#[command(about = "Load Spotify track data from CSV or SQLite into SQLite or MySQL", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the inferred schema of a source without writing anywhere
    Inspect {
        /// CSV source file
        #[arg(long, conflicts_with = "db")]
        csv: Option<PathBuf>,
        /// SQLite source database
        #[arg(long, requires = "table")]
        db: Option<PathBuf>,
        /// Table inside the SQLite source
        #[arg(long)]
        table: Option<String>,
    },
    /// Load a CSV file into a destination table (drops any existing table)
    Load {
        /// CSV source file
        #[arg(long)]
        csv: PathBuf,
        /// Destination: mysql:// URL or SQLite file path
        #[arg(long)]
        dest: Option<String>,
        /// TOML file with MySQL host/user/password/database settings
        #[arg(long)]
        mysql_config: Option<PathBuf>,
        /// Destination table name
        #[arg(long, default_value = "tracks")]
        dest_table: String,
        /// Rows per INSERT batch
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Migrate a SQLite table into a destination table (drops any existing table)
    Migrate {
        /// SQLite source database
        #[arg(long)]
        db: PathBuf,
        /// Table inside the SQLite source
        #[arg(long, default_value = "tracks")]
        table: String,
        /// Destination: mysql:// URL or SQLite file path
        #[arg(long)]
        dest: Option<String>,
        /// TOML file with MySQL host/user/password/database settings
        #[arg(long)]
        mysql_config: Option<PathBuf>,
        /// Destination table name
        #[arg(long, default_value = "tracks")]
        dest_table: String,
        /// Rows per INSERT batch
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - default to INFO level if RUST_LOG not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { csv, db, table } => {
            let source = match (csv, db, table) {
                (Some(path), None, _) => Source::Csv { path },
                (None, Some(path), Some(table)) => Source::Sqlite { path, table },
                _ => anyhow::bail!("Pass either --csv PATH or --db PATH --table NAME"),
            };
            commands::inspect(&source)
        }
        Commands::Load {
            csv,
            dest,
            mysql_config,
            dest_table,
            batch_size,
            yes,
        } => {
            let destination = commands::resolve_destination(dest, mysql_config, dest_table)?;
            commands::load(&csv, destination, batch_size, yes).await
        }
        Commands::Migrate {
            db,
            table,
            dest,
            mysql_config,
            dest_table,
            batch_size,
            yes,
        } => {
            let destination = commands::resolve_destination(dest, mysql_config, dest_table)?;
            commands::migrate(&db, &table, destination, batch_size, yes).await
        }
    }
}
