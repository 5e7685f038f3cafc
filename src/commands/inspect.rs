// ABOUTME: Inspect command: schema inference dry run
// ABOUTME: Reads a source and prints the inferred schema without writing anywhere

use crate::migration::{read_and_infer, Source};
use anyhow::{Context, Result};

/// Read the source, infer its schema, and print both. Never touches a
/// destination, so it is safe to run against anything.
pub fn inspect(source: &Source) -> Result<()> {
    let (dataset, schema) = read_and_infer(source)
        .with_context(|| format!("Failed to inspect {}", source.label()))?;

    println!();
    println!("Source: {}", source.label());
    println!("Rows:   {}", dataset.row_count());
    println!();
    println!("Inferred schema:");

    let widest = schema
        .columns
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(0);

    for col in &schema.columns {
        println!("  {:width$}  {}", col.name, col.ty.name(), width = widest);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_inspect_csv() {
        let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(tmp, "track_name,popularity\nSong A,87\n").unwrap();

        let source = Source::Csv {
            path: tmp.path().to_path_buf(),
        };
        assert!(inspect(&source).is_ok());
    }

    #[test]
    fn test_inspect_missing_source() {
        let source = Source::Csv {
            path: "/nonexistent/tracks.csv".into(),
        };
        assert!(inspect(&source).is_err());
    }
}
