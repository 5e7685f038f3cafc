// ABOUTME: Migrate command: SQLite table into a SQLite or MySQL destination table
// ABOUTME: Confirms the destructive drop, runs the migration, prints the summary

use crate::migration::{self, Destination, MigrationOptions, Source};
use anyhow::{Context, Result};
use std::path::Path;

/// Migrate one SQLite table into the destination table.
pub async fn migrate(
    db: &Path,
    table: &str,
    destination: Destination,
    batch_size: usize,
    yes: bool,
) -> Result<()> {
    let source = Source::Sqlite {
        path: db.to_path_buf(),
        table: table.to_string(),
    };

    super::confirm_drop(&destination, yes)?;

    let spinner = super::progress_spinner(format!(
        "Migrating {} into {}",
        source.label(),
        destination.label()
    ));

    let options = MigrationOptions { batch_size };
    let result = migration::run(&source, &destination, &options).await;

    spinner.finish_and_clear();

    let report = result.context("SQLite migration failed")?;
    super::print_report(&report);

    Ok(())
}
