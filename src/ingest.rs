// ABOUTME: CSV file ingestion into the in-memory Dataset model
// ABOUTME: Header row becomes column names; empty cells become NULL

use crate::dataset::{Dataset, Value};
use crate::error::SourceError;
use csv::ReaderBuilder;
use std::path::Path;

/// Read a UTF-8 CSV file with a header row into a Dataset.
///
/// The header row names the columns. Every data cell arrives as `Text`,
/// except empty cells, which become `Null` — type assignment is the schema
/// inferencer's job, not the reader's.
///
/// # Errors
///
/// - `SourceError::FileNotFound` if the path does not point at a file
/// - `SourceError::EmptyHeader` if the file has no header row or no columns
/// - `SourceError::Csv` for any parse failure (ragged rows, bad UTF-8)
pub fn read_csv(path: &Path) -> Result<Dataset, SourceError> {
    if !path.is_file() {
        return Err(SourceError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    tracing::info!("Reading CSV from {}", path.display());

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| SourceError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = reader
        .headers()
        .map_err(|source| SourceError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(SourceError::EmptyHeader {
            path: path.to_path_buf(),
        });
    }

    let columns: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
    let mut dataset = Dataset::new(columns);

    for record in reader.records() {
        let record = record.map_err(|source| SourceError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let row = record
            .iter()
            .map(|cell| {
                if cell.is_empty() {
                    Value::Null
                } else {
                    Value::Text(cell.to_string())
                }
            })
            .collect();

        dataset.push_row(row);
    }

    tracing::info!(
        "Read {} rows with {} columns from {}",
        dataset.row_count(),
        dataset.column_count(),
        path.display()
    );

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(tmp, "{}", contents).unwrap();
        tmp
    }

    #[test]
    fn test_read_simple_csv() {
        let tmp = write_csv("track_name,popularity,explicit\nSong A,87,True\nSong B,12,False\n");
        let ds = read_csv(tmp.path()).unwrap();

        assert_eq!(ds.columns(), &["track_name", "popularity", "explicit"]);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.rows()[0][0], Value::Text("Song A".to_string()));
        assert_eq!(ds.rows()[1][1], Value::Text("12".to_string()));
    }

    #[test]
    fn test_empty_cell_becomes_null() {
        let tmp = write_csv("a,b\n1,\n,2\n");
        let ds = read_csv(tmp.path()).unwrap();

        assert_eq!(ds.rows()[0][1], Value::Null);
        assert_eq!(ds.rows()[1][0], Value::Null);
    }

    #[test]
    fn test_quoted_fields() {
        let tmp = write_csv("name,genre\n\"Last, First\",pop\n");
        let ds = read_csv(tmp.path()).unwrap();

        assert_eq!(ds.rows()[0][0], Value::Text("Last, First".to_string()));
    }

    #[test]
    fn test_missing_file() {
        let result = read_csv(Path::new("/nonexistent/tracks.csv"));
        assert!(matches!(result, Err(SourceError::FileNotFound { .. })));
    }

    #[test]
    fn test_header_only_csv() {
        let tmp = write_csv("a,b,c\n");
        let ds = read_csv(tmp.path()).unwrap();
        assert_eq!(ds.column_count(), 3);
        assert_eq!(ds.row_count(), 0);
    }
}
