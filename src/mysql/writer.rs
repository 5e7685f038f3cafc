// ABOUTME: MySQL destination provisioning and batched row loading
// ABOUTME: Mirrors the SQLite writer over the async MySQL driver

use crate::dataset::{Dataset, Value};
use crate::error::{LoadError, ProvisioningError};
use crate::ident::{quote_mysql, validate_column_name, validate_table_name};
use crate::loader::{coerce_row, LoadReport};
use crate::schema::{Dialect, TableSchema};
use mysql_async::prelude::*;
use mysql_async::{Conn, Params};

/// Render the CREATE TABLE statement for a schema.
///
/// Split out from `provision_table` so the generated DDL is testable
/// without a live server.
pub fn build_create_table_sql(table: &str, schema: &TableSchema) -> String {
    let col_defs: Vec<String> = schema
        .columns
        .iter()
        .map(|col| format!("{} {}", quote_mysql(&col.name), col.sql_type(Dialect::Mysql)))
        .collect();

    format!("CREATE TABLE {} ({})", quote_mysql(table), col_defs.join(", "))
}

/// Render the parameterized INSERT statement for a schema.
pub fn build_insert_sql(table: &str, schema: &TableSchema) -> String {
    let columns: Vec<String> = schema
        .columns
        .iter()
        .map(|c| quote_mysql(&c.name))
        .collect();
    let placeholders = vec!["?"; columns.len()].join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_mysql(table),
        columns.join(", "),
        placeholders
    )
}

/// Drop any pre-existing table of this name and create it fresh.
///
/// Same drop-and-recreate contract as the SQLite writer; text columns are
/// sized from the widest observed value.
pub async fn provision_table(
    conn: &mut Conn,
    table: &str,
    schema: &TableSchema,
) -> Result<(), ProvisioningError> {
    validate_identifiers(table, schema)?;

    tracing::info!("Provisioning MySQL table '{}' (drop and recreate)", table);

    let drop_sql = format!("DROP TABLE IF EXISTS {}", quote_mysql(table));
    conn.query_drop(&drop_sql)
        .await
        .map_err(|source| ProvisioningError::Mysql {
            table: table.to_string(),
            source,
        })?;

    let create_sql = build_create_table_sql(table, schema);
    conn.query_drop(&create_sql)
        .await
        .map_err(|source| ProvisioningError::Mysql {
            table: table.to_string(),
            source,
        })?;

    tracing::info!(
        "Created MySQL table '{}' with {} columns",
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
/// Each batch is sent with a single prepared statement executed per row
/// server-side. Rows failing coercion are recorded and skipped; only
/// driver-level failures are fatal, and batches already sent stay in the
/// table.
pub async fn load_rows(
    conn: &mut Conn,
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

    let insert_sql = build_insert_sql(table, schema);

    tracing::info!(
        "Loading {} rows into MySQL table '{}' in batches of {}",
        dataset.row_count(),
        table,
        batch_size
    );

    for (batch_idx, chunk) in dataset.rows().chunks(batch_size).enumerate() {
        let mut batch_params = Vec::with_capacity(chunk.len());

        for (offset, row) in chunk.iter().enumerate() {
            let row_idx = batch_idx * batch_size + offset;

            match coerce_row(schema, row_idx, row) {
                Ok(values) => {
                    let params: Vec<mysql_async::Value> = values.iter().map(to_mysql).collect();
                    batch_params.push(Params::Positional(params));
                }
                Err(failure) => {
                    tracing::debug!("Skipping {}", failure);
                    report.failures.push(failure);
                }
            }
        }

        let inserted = batch_params.len();
        if inserted > 0 {
            conn.exec_batch(&insert_sql, batch_params)
                .await
                .map_err(|source| LoadError::Mysql {
                    table: table.to_string(),
                    batch: batch_idx,
                    source,
                })?;
        }
        report.succeeded += inserted;

        tracing::debug!(
            "Sent batch {} into '{}' ({}/{} rows so far)",
            batch_idx,
            table,
            report.succeeded,
            dataset.row_count()
        );
    }

    tracing::info!(
        "Loaded {}/{} rows into MySQL table '{}' ({} skipped)",
        report.succeeded,
        report.attempted,
        table,
        report.failed()
    );

    Ok(report)
}

fn to_mysql(value: &Value) -> mysql_async::Value {
    match value {
        Value::Null => mysql_async::Value::NULL,
        Value::Text(s) => mysql_async::Value::Bytes(s.as_bytes().to_vec()),
        Value::Integer(i) => mysql_async::Value::Int(*i),
        Value::Float(f) => mysql_async::Value::Double(*f),
        // BOOLEAN is TINYINT(1) under the hood
        Value::Boolean(b) => mysql_async::Value::Int(*b as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnSchema, ColumnType};

    fn tracks_schema() -> TableSchema {
        TableSchema {
            columns: vec![
                ColumnSchema {
                    name: "track_name".to_string(),
                    ty: ColumnType::Text,
                    max_text_len: 120,
                },
                ColumnSchema {
                    name: "popularity".to_string(),
                    ty: ColumnType::Integer,
                    max_text_len: 3,
                },
                ColumnSchema {
                    name: "tempo".to_string(),
                    ty: ColumnType::Float,
                    max_text_len: 7,
                },
                ColumnSchema {
                    name: "explicit".to_string(),
                    ty: ColumnType::Boolean,
                    max_text_len: 5,
                },
            ],
        }
    }

    #[test]
    fn test_create_table_sql() {
        let sql = build_create_table_sql("tracks", &tracks_schema());
        assert_eq!(
            sql,
            "CREATE TABLE `tracks` (`track_name` VARCHAR(255), \
             `popularity` BIGINT, `tempo` DOUBLE, `explicit` BOOLEAN)"
        );
    }

    #[test]
    fn test_insert_sql() {
        let sql = build_insert_sql("tracks", &tracks_schema());
        assert_eq!(
            sql,
            "INSERT INTO `tracks` (`track_name`, `popularity`, `tempo`, `explicit`) \
             VALUES (?, ?, ?, ?)"
        );
    }

    #[test]
    fn test_to_mysql_values() {
        assert_eq!(to_mysql(&Value::Null), mysql_async::Value::NULL);
        assert_eq!(to_mysql(&Value::Integer(87)), mysql_async::Value::Int(87));
        assert_eq!(
            to_mysql(&Value::Float(118.2)),
            mysql_async::Value::Double(118.2)
        );
        assert_eq!(to_mysql(&Value::Boolean(true)), mysql_async::Value::Int(1));
        assert_eq!(
            to_mysql(&Value::Text("Song A".to_string())),
            mysql_async::Value::Bytes(b"Song A".to_vec())
        );
    }

    #[test]
    fn test_validate_identifiers_rejects_injection() {
        let schema = tracks_schema();
        assert!(matches!(
            validate_identifiers("tracks`; DROP TABLE tracks", &schema),
            Err(ProvisioningError::InvalidTableName { .. })
        ));
    }
}
