//! Download the drought monitor workbook and tidy it.
//!
//! CONAGUA publishes the full municipal record as a single wide XLSX,
//! one date column per monitor issue.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use calamine::{open_workbook, Reader, Xlsx};
use chrono::NaiveDate;
use tempfile::TempDir;

use crate::{
    cli::{create_progress_bar, create_spinner},
    download::download_file,
    export,
    reading::{
        msm::{parse_date_header, ID_COLUMNS},
        MsmWideRecord,
    },
    tidy,
};

use super::{make_output_file_name, OutputFormat};

const MSM_URL: &str = "https://smn.conagua.gob.mx/tools/RESOURCES/\
                       Monitor%20de%20Sequia%20en%20Mexico/MunicipiosSequia.xlsx";

pub async fn msm(
    input: Option<PathBuf>,
    format: OutputFormat,
    out_dir: Option<PathBuf>,
) -> Result<String> {
    let tmp_dir = TempDir::new()?;

    let workbook_path = match input {
        Some(path) => path,
        None => download_workbook(tmp_dir.path()).await?,
    };

    let (dates, records) = read_workbook(&workbook_path)?;
    let observations = tidy::melt(&records, &dates)?;

    let file_path = make_output_file_name("sequia_municipios", format.extension(), out_dir.as_deref());
    match format {
        OutputFormat::Parquet => export::save_observations(&observations, &file_path)?,
        OutputFormat::Csv | OutputFormat::CsvGz => export::write_rows(&observations, &file_path)?,
    }

    Ok(file_path.to_string_lossy().to_string())
}

async fn download_workbook(temp_dir: &Path) -> Result<PathBuf> {
    let file_path = temp_dir.join("MunicipiosSequia.xlsx");

    let bar = create_spinner("Downloading drought monitor workbook...".to_string());
    download_file(MSM_URL, file_path.clone(), bar.clone()).await?;
    bar.finish_with_message("Drought monitor workbook downloaded");

    Ok(file_path)
}

/// Reads the wide sheet: date headers from the first row, one record
/// per municipality row.
fn read_workbook(path: &Path) -> Result<(Vec<NaiveDate>, Vec<MsmWideRecord>)> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("workbook has no sheets"))?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| anyhow!("workbook sheet is empty"))?;
    if header.len() <= ID_COLUMNS {
        return Err(anyhow!("workbook sheet has no date columns"));
    }

    let dates = header[ID_COLUMNS..]
        .iter()
        .map(parse_date_header)
        .collect::<Result<Vec<_>>>()?;

    let pb = create_progress_bar(range.height() as u64 - 1, "Parsing municipality rows".to_string());
    let mut records = Vec::new();
    for row in rows {
        records.push(MsmWideRecord::from_row(row)?);
        pb.inc(1);
    }
    pb.finish_with_message("Municipality rows parsed");

    Ok((dates, records))
}
