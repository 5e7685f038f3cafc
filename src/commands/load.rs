// ABOUTME: Load command: CSV file into a SQLite or MySQL destination table
// ABOUTME: Confirms the destructive drop, runs the migration, prints the summary

use crate::migration::{self, Destination, MigrationOptions, Source};
use anyhow::{Context, Result};
use std::path::Path;

/// Load a CSV file into the destination table.
pub async fn load(
    csv: &Path,
    destination: Destination,
    batch_size: usize,
    yes: bool,
) -> Result<()> {
    let source = Source::Csv {
        path: csv.to_path_buf(),
    };

    super::confirm_drop(&destination, yes)?;

    let spinner = super::progress_spinner(format!(
        "Loading {} into {}",
        source.label(),
        destination.label()
    ));

    let options = MigrationOptions { batch_size };
    let result = migration::run(&source, &destination, &options).await;

    spinner.finish_and_clear();

    let report = result.context("CSV load failed")?;
    super::print_report(&report);

    Ok(())
}
