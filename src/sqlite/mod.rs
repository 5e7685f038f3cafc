// ABOUTME: SQLite connection handling for both source and destination roles
// ABOUTME: Validates file paths and opens read-only or writable connections

pub mod reader;
pub mod writer;

use crate::error::SourceError;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Check that a path carries a SQLite extension (.db, .sqlite, .sqlite3).
fn has_sqlite_extension(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("db") | Some("sqlite") | Some("sqlite3")
    )
}

/// Validate a SQLite source path.
///
/// The file must exist, be a regular file, and carry a recognized SQLite
/// extension. Relative paths and symlinks are resolved before checking.
pub fn validate_source_path(path: &Path) -> Result<PathBuf, SourceError> {
    let canonical = path.canonicalize().map_err(|_| SourceError::FileNotFound {
        path: path.to_path_buf(),
    })?;

    if !canonical.is_file() {
        return Err(SourceError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    if !has_sqlite_extension(&canonical) {
        return Err(SourceError::InvalidExtension {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!("Validated SQLite source path: {}", canonical.display());

    Ok(canonical)
}

/// Open a SQLite source database in read-only mode.
///
/// Read-only keeps a migration from ever mutating its own source. A version
/// query verifies the file is actually a readable database.
pub fn open_readonly(path: &Path) -> Result<rusqlite::Connection, SourceError> {
    let canonical = validate_source_path(path)?;

    tracing::info!("Opening SQLite source: {}", canonical.display());

    let conn = rusqlite::Connection::open_with_flags(
        &canonical,
        rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
    )
    .map_err(|source| SourceError::Sqlite {
        path: path.to_path_buf(),
        source,
    })?;

    conn.query_row("SELECT sqlite_version()", [], |row| row.get::<_, String>(0))
        .map_err(|source| SourceError::Sqlite {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(conn)
}

/// Open (or create) a SQLite destination database for writing.
///
/// Unlike sources, the file does not have to exist yet, but the extension
/// must still look like SQLite so a typo never creates a stray file.
pub fn open_destination(path: &Path) -> Result<rusqlite::Connection> {
    if !has_sqlite_extension(path) {
        bail!(
            "Destination '{}' does not look like a SQLite file. \
             Expected a .db, .sqlite, or .sqlite3 extension.",
            path.display()
        );
    }

    tracing::info!("Opening SQLite destination: {}", path.display());

    rusqlite::Connection::open(path)
        .with_context(|| format!("Failed to open SQLite destination: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_nonexistent_file() {
        let result = validate_source_path(Path::new("/nonexistent/tracks.db"));
        assert!(matches!(result, Err(SourceError::FileNotFound { .. })));
    }

    #[test]
    fn test_validate_wrong_extension() {
        let tmp = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let result = validate_source_path(tmp.path());
        assert!(matches!(result, Err(SourceError::InvalidExtension { .. })));
    }

    #[test]
    fn test_validate_valid_extensions() {
        for ext in ["db", "sqlite", "sqlite3"] {
            let tmp = tempfile::Builder::new()
                .suffix(&format!(".{}", ext))
                .tempfile()
                .unwrap();
            assert!(
                validate_source_path(tmp.path()).is_ok(),
                "extension .{} should be valid",
                ext
            );
        }
    }

    #[test]
    fn test_open_readonly_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("tracks.db");

        {
            let conn = rusqlite::Connection::open(&db_path).unwrap();
            conn.execute("CREATE TABLE t (id INTEGER)", []).unwrap();
        }

        let conn = open_readonly(&db_path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);

        let write = conn.execute("INSERT INTO t VALUES (1)", []);
        assert!(write.is_err());
    }

    #[test]
    fn test_open_destination_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("new.db");
        assert!(!db_path.exists());

        let conn = open_destination(&db_path).unwrap();
        conn.execute("CREATE TABLE t (id INTEGER)", []).unwrap();
        assert!(db_path.exists());
    }

    #[test]
    fn test_open_destination_rejects_odd_extension() {
        let dir = tempfile::tempdir().unwrap();
        let result = open_destination(&dir.path().join("tracks.csv"));
        assert!(result.is_err());
    }
}
