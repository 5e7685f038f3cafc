// ABOUTME: Command implementations behind the CLI subcommands
// ABOUTME: Shared destination resolution, confirmation gate, and report printing

pub mod inspect;
pub mod load;
pub mod migrate;

pub use inspect::inspect;
pub use load::load;
pub use migrate::migrate;

use crate::config::load_mysql_config;
use crate::migration::{Destination, MigrationReport};
use anyhow::{bail, Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::time::Duration;

/// How many per-row failures to print before summarizing the rest.
const MAX_PRINTED_FAILURES: usize = 10;

/// Resolve the destination from CLI arguments.
///
/// Exactly one of `--dest` (a mysql:// URL or a SQLite file path) or
/// `--mysql-config` (a TOML credentials file) must be given.
pub fn resolve_destination(
    dest: Option<String>,
    mysql_config: Option<PathBuf>,
    table: String,
) -> Result<Destination> {
    match (dest, mysql_config) {
        (Some(_), Some(_)) => {
            bail!("--dest and --mysql-config are mutually exclusive; pass one of them")
        }
        (None, None) => {
            bail!("No destination given; pass --dest <URL or .db path> or --mysql-config <FILE>")
        }
        (None, Some(config_path)) => {
            let config = load_mysql_config(&config_path)
                .with_context(|| format!("Failed to load {}", config_path.display()))?;
            Ok(Destination::Mysql {
                url: config.url(),
                table,
            })
        }
        (Some(dest), None) => {
            if dest.starts_with("mysql://") {
                Ok(Destination::Mysql { url: dest, table })
            } else {
                Ok(Destination::Sqlite {
                    path: PathBuf::from(dest),
                    table,
                })
            }
        }
    }
}

/// Gate for the destructive drop-and-recreate step.
///
/// Provisioning replaces the destination table wholesale, so unless
/// `--yes` was passed the user has to confirm interactively.
pub fn confirm_drop(destination: &Destination, yes: bool) -> Result<()> {
    if yes {
        return Ok(());
    }

    println!();
    println!(
        "Table '{}' at {} will be DROPPED and recreated.",
        destination.table(),
        destination.label()
    );
    println!("Any existing data in that table will be lost.");
    println!();

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Proceed?")
        .default(false)
        .interact()
        .context("Failed to get confirmation")?;

    if !confirmed {
        tracing::warn!("Cancelled by user");
        bail!("Cancelled by user");
    }

    Ok(())
}

/// Spinner shown while a migration is in flight.
pub fn progress_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Print the run summary the way the migration scripts always did:
/// attempted / succeeded / failed, then the first few failure reasons.
pub fn print_report(report: &MigrationReport) {
    println!();
    println!("Migration summary");
    println!("  source:      {}", report.source);
    println!("  destination: {}", report.destination);
    println!("  attempted:   {}", report.attempted);
    println!("  succeeded:   {}", report.succeeded);
    println!("  failed:      {}", report.failed());

    if !report.failures.is_empty() {
        println!();
        println!("Skipped rows:");
        for failure in report.failures.iter().take(MAX_PRINTED_FAILURES) {
            println!("  {}", failure);
        }
        if report.failures.len() > MAX_PRINTED_FAILURES {
            println!(
                "  ... and {} more",
                report.failures.len() - MAX_PRINTED_FAILURES
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_sqlite_destination() {
        let dest =
            resolve_destination(Some("/tmp/tracks.db".to_string()), None, "tracks".to_string())
                .unwrap();
        assert!(matches!(dest, Destination::Sqlite { .. }));
    }

    #[test]
    fn test_resolve_mysql_url_destination() {
        let dest = resolve_destination(
            Some("mysql://root@localhost:3306/spotify".to_string()),
            None,
            "tracks".to_string(),
        )
        .unwrap();
        assert!(matches!(dest, Destination::Mysql { .. }));
    }

    #[test]
    fn test_resolve_requires_a_destination() {
        assert!(resolve_destination(None, None, "tracks".to_string()).is_err());
    }

    #[test]
    fn test_resolve_rejects_both() {
        let result = resolve_destination(
            Some("/tmp/tracks.db".to_string()),
            Some(PathBuf::from("/tmp/etl.toml")),
            "tracks".to_string(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_mysql_config_destination() {
        use std::io::Write;
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "database = \"spotify\"").unwrap();

        let dest = resolve_destination(
            None,
            Some(tmp.path().to_path_buf()),
            "tracks".to_string(),
        )
        .unwrap();

        match dest {
            Destination::Mysql { url, table } => {
                assert_eq!(url, "mysql://root@localhost:3306/spotify");
                assert_eq!(table, "tracks");
            }
            other => panic!("expected MySQL destination, got {:?}", other),
        }
    }
}
