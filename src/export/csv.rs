//! Typed CSV table IO. Paths ending in `.gz` are read and written
//! through gzip transparently.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::Result;
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::{de::DeserializeOwned, Serialize};

/// Writes one CSV row per record, headers from the record's fields.
pub fn write_rows<T: Serialize>(rows: &[T], path: &Path) -> Result<()> {
    let file = File::create(path)?;

    let sink: Box<dyn Write> = if is_gzipped(path) {
        Box::new(GzEncoder::new(BufWriter::new(file), Compression::default()))
    } else {
        Box::new(BufWriter::new(file))
    };

    let mut writer = csv::Writer::from_writer(sink);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Reads a whole CSV file into typed records.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)?;

    let source: Box<dyn Read> = if is_gzipped(path) {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut reader = csv::Reader::from_reader(source);
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }

    Ok(rows)
}

fn is_gzipped(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        cve_ent: String,
        poblacion: u64,
    }

    fn rows_fixture() -> Vec<Row> {
        vec![
            Row {
                cve_ent: "01".to_string(),
                poblacion: 1_425_607,
            },
            Row {
                cve_ent: "09".to_string(),
                poblacion: 9_209_944,
            },
        ]
    }

    #[test]
    fn should_round_trip_plain_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tabla.csv");

        write_rows(&rows_fixture(), &path).unwrap();
        let rows: Vec<Row> = read_rows(&path).unwrap();

        assert_eq!(rows, rows_fixture());
    }

    #[test]
    fn should_round_trip_gzipped_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tabla.csv.gz");

        write_rows(&rows_fixture(), &path).unwrap();

        // The file on disk is a gzip stream, not plain text.
        let raw = std::fs::read(&path).unwrap();
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);

        let rows: Vec<Row> = read_rows(&path).unwrap();
        assert_eq!(rows, rows_fixture());
    }

    #[test]
    fn should_write_headers_from_field_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tabla.csv");

        write_rows(&rows_fixture(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("cve_ent,poblacion\n"));
    }
}
