// ABOUTME: SQLite source introspection and data reading
// ABOUTME: Lists tables and reads a table into a Dataset

use crate::dataset::{Dataset, Value};
use crate::error::SourceError;
use rusqlite::Connection;

/// List all user tables in a SQLite database
///
/// Queries sqlite_master for user-created tables, excluding sqlite_*
/// system tables (sqlite_sequence, sqlite_stat1, etc.).
///
/// # Returns
///
/// Sorted vector of table names
pub fn list_tables(conn: &Connection) -> Result<Vec<String>, SourceError> {
    tracing::debug!("Listing tables from SQLite source");

    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master \
             WHERE type='table' \
             AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )
        .map_err(|source| SourceError::Query {
            table: "sqlite_master".to_string(),
            source,
        })?;

    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .and_then(|rows| rows.collect::<Result<Vec<String>, _>>())
        .map_err(|source| SourceError::Query {
            table: "sqlite_master".to_string(),
            source,
        })?;

    tracing::info!("Found {} user table(s) in SQLite source", tables.len());

    Ok(tables)
}

/// Check whether the named table exists in the source.
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool, SourceError> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .map_err(|source| SourceError::Query {
            table: table.to_string(),
            source,
        })?;

    Ok(count > 0)
}

/// Read an entire SQLite table into a Dataset.
///
/// Columns keep their declared order; SQLite storage classes map onto the
/// Dataset value model (INTEGER, REAL, TEXT, NULL). BLOBs have no place in
/// a track dataset and are read as lossy UTF-8 text.
///
/// Loads all rows into memory, which is fine at this workload's scale.
///
/// # Errors
///
/// `SourceError::TableNotFound` if the table is absent, `SourceError::Query`
/// for any SQLite failure.
pub fn read_table(conn: &Connection, table: &str) -> Result<Dataset, SourceError> {
    crate::ident::validate_table_name(table).map_err(|_| SourceError::TableNotFound {
        table: table.to_string(),
    })?;

    if !table_exists(conn, table)? {
        if let Ok(available) = list_tables(conn) {
            tracing::warn!(
                "Table '{}' not found; source contains: {:?}",
                table,
                available
            );
        }
        return Err(SourceError::TableNotFound {
            table: table.to_string(),
        });
    }

    tracing::info!("Reading all rows from SQLite table '{}'", table);

    let query = format!("SELECT * FROM \"{}\"", table);

    let mut stmt = conn.prepare(&query).map_err(|source| SourceError::Query {
        table: table.to_string(),
        source,
    })?;

    let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
    let column_count = columns.len();
    let mut dataset = Dataset::new(columns);

    let rows = stmt
        .query_map([], |row| {
            let mut values = Vec::with_capacity(column_count);
            for idx in 0..column_count {
                let value: rusqlite::types::Value = row.get(idx)?;
                values.push(from_sqlite(value));
            }
            Ok(values)
        })
        .and_then(|mapped| mapped.collect::<Result<Vec<_>, _>>())
        .map_err(|source| SourceError::Query {
            table: table.to_string(),
            source,
        })?;

    for row in rows {
        dataset.push_row(row);
    }

    tracing::info!("Read {} rows from table '{}'", dataset.row_count(), table);

    Ok(dataset)
}

fn from_sqlite(value: rusqlite::types::Value) -> Value {
    match value {
        rusqlite::types::Value::Null => Value::Null,
        rusqlite::types::Value::Integer(i) => Value::Integer(i),
        rusqlite::types::Value::Real(f) => Value::Float(f),
        rusqlite::types::Value::Text(s) => Value::Text(s),
        rusqlite::types::Value::Blob(b) => Value::Text(String::from_utf8_lossy(&b).into_owned()),
    }
}
