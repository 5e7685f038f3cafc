// ABOUTME: SQL identifier validation for table and column names
// ABOUTME: Prevents injection through names spliced into DDL and INSERT statements

use anyhow::{bail, Result};

/// Validate a table name to prevent SQL injection
///
/// Table names must contain only:
/// - Lowercase letters (a-z)
/// - Uppercase letters (A-Z)
/// - Digits (0-9)
/// - Underscores (_)
///
/// This prevents SQL injection attacks through table names, which are
/// interpolated (quoted) into DDL and INSERT statements rather than bound
/// as parameters.
///
/// # Arguments
///
/// * `name` - The table name to validate
///
/// # Returns
///
/// Ok(()) if valid, Err with message if invalid
///
/// # Examples
///
/// ```
/// # use track_etl::ident::validate_table_name;
/// assert!(validate_table_name("tracks").is_ok());
/// assert!(validate_table_name("spotify_tracks_2024").is_ok());
/// assert!(validate_table_name("tracks; DROP TABLE tracks;").is_err());
/// assert!(validate_table_name("tracks'--").is_err());
/// ```
pub fn validate_table_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Table name cannot be empty");
    }

    if name.len() > 63 {
        bail!("Table name too long (max 63 characters): {}", name);
    }

    for ch in name.chars() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            bail!(
                "Invalid table name '{}': contains invalid character '{}'. \
                Only alphanumeric characters and underscores are allowed.",
                name,
                ch
            );
        }
    }

    // Prevent reserved SQL keywords (case-insensitive)
    let lower = name.to_lowercase();
    let reserved_keywords = [
        "select",
        "insert",
        "update",
        "delete",
        "drop",
        "create",
        "alter",
        "table",
        "database",
        "index",
        "view",
        "function",
        "procedure",
        "trigger",
        "user",
        "role",
        "grant",
        "revoke",
    ];

    if reserved_keywords.contains(&lower.as_str()) {
        bail!("Invalid table name '{}': cannot use SQL reserved keyword", name);
    }

    Ok(())
}

/// Validate a column name with the same character rules as table names.
///
/// Column names come straight from CSV headers, so this is the gate that
/// rejects malformed or hostile headers before they reach DDL. Reserved
/// keywords are allowed here since columns are always quoted.
pub fn validate_column_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Column name cannot be empty");
    }

    if name.len() > 63 {
        bail!("Column name too long (max 63 characters): {}", name);
    }

    for ch in name.chars() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            bail!(
                "Invalid column name '{}': contains invalid character '{}'. \
                Only alphanumeric characters and underscores are allowed.",
                name,
                ch
            );
        }
    }

    Ok(())
}

/// Quote an already-validated identifier for SQLite (double quotes).
pub fn quote_sqlite(name: &str) -> String {
    format!("\"{}\"", name)
}

/// Quote an already-validated identifier for MySQL (backticks).
pub fn quote_mysql(name: &str) -> String {
    format!("`{}`", name)
}
