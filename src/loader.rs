// ABOUTME: Shared row-loading machinery used by both destination writers
// ABOUTME: Row coercion, per-row failure records, and the load report

use crate::dataset::Value;
use crate::schema::{coerce_value, TableSchema};

/// Default number of rows per INSERT batch.
///
/// Bounds memory and round trips; the value has no semantic meaning.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// One row that could not be coerced to the destination schema.
///
/// Recorded and skipped; never fatal to the batch or the run.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    /// Zero-based index of the row in the source dataset.
    pub row: usize,
    /// Column whose value failed to coerce.
    pub column: String,
    pub reason: String,
}

impl std::fmt::Display for RowFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: column '{}': {}", self.row, self.column, self.reason)
    }
}

/// Outcome of loading one dataset into one destination table.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<RowFailure>,
}

impl LoadReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Coerce every cell of a row to its column's declared type.
///
/// Returns the typed row, or the first failure encountered. The whole row
/// is skipped on any cell failure — partial rows are never inserted.
pub fn coerce_row(
    schema: &TableSchema,
    row_idx: usize,
    row: &[Value],
) -> Result<Vec<Value>, RowFailure> {
    let mut coerced = Vec::with_capacity(row.len());

    for (col, value) in schema.columns.iter().zip(row.iter()) {
        match coerce_value(value, col.ty) {
            Ok(v) => coerced.push(v),
            Err(reason) => {
                return Err(RowFailure {
                    row: row_idx,
                    column: col.name.clone(),
                    reason,
                });
            }
        }
    }

    Ok(coerced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::schema::infer_schema;

    fn schema_for(rows: &[&[&str]]) -> (TableSchema, Dataset) {
        let mut ds = Dataset::new(vec!["name".into(), "popularity".into(), "explicit".into()]);
        for row in rows {
            ds.push_row(
                row.iter()
                    .map(|c| {
                        if c.is_empty() {
                            Value::Null
                        } else {
                            Value::Text(c.to_string())
                        }
                    })
                    .collect(),
            );
        }
        let schema = infer_schema(&ds).unwrap();
        (schema, ds)
    }

    #[test]
    fn test_coerce_row_success() {
        let (schema, ds) = schema_for(&[&["Song A", "87", "True"]]);
        let coerced = coerce_row(&schema, 0, &ds.rows()[0]).unwrap();
        assert_eq!(
            coerced,
            vec![
                Value::Text("Song A".into()),
                Value::Integer(87),
                Value::Boolean(true)
            ]
        );
    }

    #[test]
    fn test_coerce_row_failure_names_column() {
        // Schema inferred from the good row; bad row fails against it
        let (schema, _) = schema_for(&[&["Song A", "87", "True"]]);
        let bad = vec![
            Value::Text("Song B".into()),
            Value::Text("not_a_number".into()),
            Value::Text("False".into()),
        ];
        let failure = coerce_row(&schema, 1, &bad).unwrap_err();
        assert_eq!(failure.row, 1);
        assert_eq!(failure.column, "popularity");
        assert!(failure.reason.contains("not_a_number"));
    }

    #[test]
    fn test_load_report_counts() {
        let report = LoadReport {
            attempted: 10,
            succeeded: 8,
            failures: vec![
                RowFailure {
                    row: 3,
                    column: "popularity".into(),
                    reason: "bad".into(),
                },
                RowFailure {
                    row: 7,
                    column: "explicit".into(),
                    reason: "bad".into(),
                },
            ],
        };
        assert_eq!(report.failed(), 2);
        assert_eq!(report.attempted, report.succeeded + report.failed());
    }
}
