// ABOUTME: SQLite destination provisioning and batched row loading
// ABOUTME: Drop-and-recreate DDL plus best-effort batch inserts with coercion

use crate::dataset::{Dataset, Value};
use crate::error::{LoadError, ProvisioningError};
use crate::ident::{quote_sqlite, validate_column_name, validate_table_name};
use crate::loader::{coerce_row, LoadReport};
use crate::schema::{Dialect, TableSchema};
use rusqlite::Connection;

/// Drop any pre-existing table of this name and create it fresh.
///
/// Destructive and not reversible; the commands layer confirms with the
/// user before this runs. Columns are created in schema order with SQLite
/// native types (booleans become INTEGER).
pub fn provision_table(
    conn: &Connection,
    table: &str,
    schema: &TableSchema,
) -> Result<(), ProvisioningError> {
    validate_identifiers(table, schema)?;

    tracing::info!("Provisioning SQLite table '{}' (drop and recreate)", table);

    let drop_sql = format!("DROP TABLE IF EXISTS {}", quote_sqlite(table));
    conn.execute(&drop_sql, [])
        .map_err(|source| ProvisioningError::Sqlite {
            table: table.to_string(),
            source,
        })?;

    let col_defs: Vec<String> = schema
        .columns
        .iter()
        .map(|col| format!("{} {}", quote_sqlite(&col.name), col.sql_type(Dialect::Sqlite)))
        .collect();

    let create_sql = format!(
        "CREATE TABLE {} ({})",
        quote_sqlite(table),
        col_defs.join(", ")
    );
    conn.execute(&create_sql, [])
        .map_err(|source| ProvisioningError::Sqlite {
            table: table.to_string(),
            source,
        })?;

    tracing::info!(
        "Created SQLite table '{}' with {} columns",
        table,
        schema.columns.len()
    );

    Ok(())
}

fn validate_identifiers(table: &str, schema: &TableSchema) -> Result<(), ProvisioningError> {
    validate_table_name(table).map_err(|e| ProvisioningError::InvalidTableName {
        name: table.to_string(),
        reason: e.to_string(),
    })?;

    for col in &schema.columns {
        validate_column_name(&col.name).map_err(|e| ProvisioningError::InvalidColumnName {
            name: col.name.clone(),
            reason: e.to_string(),
        })?;
    }

    Ok(())
}

/// Insert all dataset rows into the provisioned table in batches.
///
/// Each batch runs in its own transaction. Rows that fail coercion are
/// recorded in the report and skipped; only destination-side statement
/// failures are fatal. Batches committed before a fatal error stay in the
/// table.
pub fn load_rows(
    conn: &mut Connection,
    table: &str,
    schema: &TableSchema,
    dataset: &Dataset,
    batch_size: usize,
) -> Result<LoadReport, LoadError> {
    let batch_size = batch_size.max(1);
    let mut report = LoadReport {
        attempted: dataset.row_count(),
        ..Default::default()
    };

    if dataset.row_count() == 0 {
        return Ok(report);
    }

    let columns: Vec<String> = schema
        .columns
        .iter()
        .map(|c| quote_sqlite(&c.name))
        .collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    let insert_sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_sqlite(table),
        columns.join(", "),
        placeholders.join(", ")
    );

    tracing::info!(
        "Loading {} rows into SQLite table '{}' in batches of {}",
        dataset.row_count(),
        table,
        batch_size
    );

    for (batch_idx, chunk) in dataset.rows().chunks(batch_size).enumerate() {
        let tx = conn
            .transaction()
            .map_err(|source| LoadError::Sqlite {
                table: table.to_string(),
                batch: batch_idx,
                source,
            })?;

        {
            let mut stmt = tx.prepare(&insert_sql).map_err(|source| LoadError::Sqlite {
                table: table.to_string(),
                batch: batch_idx,
                source,
            })?;

            for (offset, row) in chunk.iter().enumerate() {
                let row_idx = batch_idx * batch_size + offset;

                let coerced = match coerce_row(schema, row_idx, row) {
                    Ok(values) => values,
                    Err(failure) => {
                        tracing::debug!("Skipping {}", failure);
                        report.failures.push(failure);
                        continue;
                    }
                };

                let params = rusqlite::params_from_iter(coerced.iter().map(to_sqlite));
                stmt.execute(params).map_err(|source| LoadError::Sqlite {
                    table: table.to_string(),
                    batch: batch_idx,
                    source,
                })?;
                report.succeeded += 1;
            }
        }

        tx.commit().map_err(|source| LoadError::Sqlite {
            table: table.to_string(),
            batch: batch_idx,
            source,
        })?;

        tracing::debug!(
            "Committed batch {} into '{}' ({}/{} rows so far)",
            batch_idx,
            table,
            report.succeeded,
            dataset.row_count()
        );
    }

    tracing::info!(
        "Loaded {}/{} rows into SQLite table '{}' ({} skipped)",
        report.succeeded,
        report.attempted,
        table,
        report.failed()
    );

    Ok(report)
}

fn to_sqlite(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Text(s) => rusqlite::types::Value::Text(s.clone()),
        Value::Integer(i) => rusqlite::types::Value::Integer(*i),
        Value::Float(f) => rusqlite::types::Value::Real(*f),
        // SQLite has no boolean storage class
        Value::Boolean(b) => rusqlite::types::Value::Integer(*b as i64),
    }
}
