// ABOUTME: Typed error taxonomy for the ETL pipeline
// ABOUTME: Separates source, inference, provisioning, and load failures

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a source into a Dataset.
///
/// All of these abort the run before any destination mutation.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Source file does not exist or is not a regular file.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// SQLite file has an unexpected extension.
    #[error("invalid SQLite file extension on '{path}': must be .db, .sqlite, or .sqlite3")]
    InvalidExtension { path: PathBuf },

    /// CSV could not be parsed.
    #[error("failed to read CSV {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// CSV has no header row or no columns.
    #[error("CSV file has no header row: {path}")]
    EmptyHeader { path: PathBuf },

    /// SQLite source file could not be opened.
    #[error("failed to open SQLite source {path}")]
    Sqlite {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A query against the SQLite source failed.
    #[error("failed to read table '{table}' from SQLite source")]
    Query {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The named table does not exist in the source database.
    #[error("table '{table}' not found in source database")]
    TableNotFound { table: String },
}

/// Errors raised by schema inference.
#[derive(Debug, Error)]
pub enum SchemaInferenceError {
    /// A dataset with zero columns cannot be mapped to a table.
    #[error("dataset has no columns")]
    NoColumns,
}

/// Errors raised while provisioning the destination table.
///
/// Provisioning is destructive (drop-and-recreate); a failure here can leave
/// the destination with the previous table dropped and the new one absent.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// Table name failed identifier validation before any DDL was sent.
    #[error("invalid table name '{name}': {reason}")]
    InvalidTableName { name: String, reason: String },

    /// Column name failed identifier validation before any DDL was sent.
    #[error("invalid column name '{name}': {reason}")]
    InvalidColumnName { name: String, reason: String },

    /// DDL execution failed against a SQLite destination.
    #[error("DDL failed for SQLite table '{table}'")]
    Sqlite {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// DDL execution failed against a MySQL destination.
    #[error("DDL failed for MySQL table '{table}'")]
    Mysql {
        table: String,
        #[source]
        source: mysql_async::Error,
    },
}

/// Fatal errors raised while loading rows into the destination.
///
/// Per-row coercion problems are NOT errors; they are collected in the
/// load report and never abort the run.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A batch insert failed against a SQLite destination.
    #[error("insert into SQLite table '{table}' failed at batch {batch}")]
    Sqlite {
        table: String,
        batch: usize,
        #[source]
        source: rusqlite::Error,
    },

    /// A batch insert failed against a MySQL destination.
    #[error("insert into MySQL table '{table}' failed at batch {batch}")]
    Mysql {
        table: String,
        batch: usize,
        #[source]
        source: mysql_async::Error,
    },
}

/// Errors surfaced by the migration orchestrator: the union of every
/// fatal failure a run can hit, in pipeline order.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to read source")]
    Source(#[from] SourceError),

    #[error("schema inference failed")]
    Inference(#[from] SchemaInferenceError),

    #[error("failed to provision destination table")]
    Provisioning(#[from] ProvisioningError),

    #[error("failed to load rows into destination")]
    Load(#[from] LoadError),

    /// Destination connection could not be established.
    #[error("failed to connect to destination: {reason}")]
    Connect { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_display() {
        let err = SourceError::TableNotFound {
            table: "tracks".to_string(),
        };
        assert_eq!(err.to_string(), "table 'tracks' not found in source database");
    }

    #[test]
    fn test_migration_error_wraps_inference() {
        let err: MigrationError = SchemaInferenceError::NoColumns.into();
        assert!(matches!(err, MigrationError::Inference(_)));
    }

    #[test]
    fn test_provisioning_error_display() {
        let err = ProvisioningError::InvalidTableName {
            name: "tracks; DROP TABLE tracks".to_string(),
            reason: "contains invalid character ';'".to_string(),
        };
        assert!(err.to_string().contains("invalid table name"));
    }
}
