//! Saves the tidy drought table to a parquet file.

use std::{fs::File, path::Path, sync::Arc};

use anyhow::Result;
use arrow::{
    array::{Date32Builder, StringBuilder, UInt32Builder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use chrono::{Datelike, NaiveDate};
use parquet::{arrow::ArrowWriter, file::properties::WriterProperties};

use crate::{cli::create_progress_bar, reading::DroughtObservation};

const CHUNK_SIZE: usize = 100_000;

pub fn save_observations(observations: &[DroughtObservation], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;

    let schema = Arc::new(Schema::new(vec![
        Field::new("cve_concatenada", DataType::UInt32, false),
        Field::new("cve_ent", DataType::Utf8, false),
        Field::new("cve_mun", DataType::Utf8, false),
        Field::new("nombre_mun", DataType::Utf8, false),
        Field::new("nombre_ent", DataType::Utf8, false),
        Field::new("full_date", DataType::Date32, false),
        Field::new("sequia", DataType::Utf8, false),
    ]));

    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::ZSTD(
            parquet::basic::ZstdLevel::default(),
        ))
        // The id and category columns repeat heavily; dictionary encode them.
        .set_dictionary_enabled(true)
        .build();

    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
    let pb = create_progress_bar(observations.len() as u64, "Writing parquet file".to_string());

    let mut builders = Builders::with_capacity(CHUNK_SIZE);
    let epoch_offset = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap().num_days_from_ce();

    let mut current_batch_rows = 0;
    let mut written = 0u64;

    for observation in observations {
        let date32 = observation.full_date.num_days_from_ce() - epoch_offset;

        builders.cve_concatenada.append_value(observation.cve_concatenada);
        builders.cve_ent.append_value(&observation.cve_ent);
        builders.cve_mun.append_value(&observation.cve_mun);
        builders.nombre_mun.append_value(&observation.nombre_mun);
        builders.nombre_ent.append_value(&observation.nombre_ent);
        builders.full_date.append_value(date32);
        builders.sequia.append_value(observation.sequia.as_str());

        current_batch_rows += 1;
        written += 1;

        if written % 10_000 == 0 {
            pb.set_position(written);
        }

        if current_batch_rows >= CHUNK_SIZE {
            write_batch(&mut writer, &schema, &mut builders)?;
            current_batch_rows = 0;
        }
    }

    if current_batch_rows > 0 {
        write_batch(&mut writer, &schema, &mut builders)?;
    }

    pb.finish_with_message("Finished writing parquet file");
    writer.close()?;

    Ok(())
}

struct Builders {
    cve_concatenada: UInt32Builder,
    cve_ent: StringBuilder,
    cve_mun: StringBuilder,
    nombre_mun: StringBuilder,
    nombre_ent: StringBuilder,
    full_date: Date32Builder,
    sequia: StringBuilder,
}

impl Builders {
    fn with_capacity(capacity: usize) -> Self {
        Builders {
            cve_concatenada: UInt32Builder::with_capacity(capacity),
            cve_ent: StringBuilder::with_capacity(capacity, capacity * 2),
            cve_mun: StringBuilder::with_capacity(capacity, capacity * 3),
            nombre_mun: StringBuilder::with_capacity(capacity, capacity * 16),
            nombre_ent: StringBuilder::with_capacity(capacity, capacity * 12),
            full_date: Date32Builder::with_capacity(capacity),
            sequia: StringBuilder::with_capacity(capacity, capacity * 4),
        }
    }
}

fn write_batch(
    writer: &mut ArrowWriter<File>,
    schema: &Arc<Schema>,
    builders: &mut Builders,
) -> Result<()> {
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(builders.cve_concatenada.finish()),
            Arc::new(builders.cve_ent.finish()),
            Arc::new(builders.cve_mun.finish()),
            Arc::new(builders.nombre_mun.finish()),
            Arc::new(builders.nombre_ent.finish()),
            Arc::new(builders.full_date.finish()),
            Arc::new(builders.sequia.finish()),
        ],
    )?;

    writer.write(&batch)?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::DroughtCategory;
    use tempfile::TempDir;

    fn observation_fixture(day: u32, sequia: DroughtCategory) -> DroughtObservation {
        DroughtObservation {
            cve_concatenada: 1001,
            cve_ent: "01".to_string(),
            cve_mun: "001".to_string(),
            nombre_mun: "Aguascalientes".to_string(),
            nombre_ent: "Aguascalientes".to_string(),
            full_date: NaiveDate::from_ymd_opt(2023, 1, day).unwrap(),
            sequia,
        }
    }

    #[test]
    fn should_write_parquet_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sequia.parquet");

        let observations = vec![
            observation_fixture(15, DroughtCategory::D0),
            observation_fixture(31, DroughtCategory::D1),
        ];

        save_observations(&observations, &path).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }
}
