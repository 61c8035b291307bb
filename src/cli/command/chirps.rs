//! Melt a CHIRPS precipitation export into long format.
//!
//! The Earth Engine job reduces the CHIRPS rasters over the state or
//! municipality geometries and exports one table per year with one
//! numeric column per period band (`01`..`12` for months, `01`..`52`
//! for weeks, or a single `YYYY` column). This command reshapes such a
//! table into one row per (region, period).

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use csv::StringRecord;

use super::make_output_file_name;

/// Aggregation period of the exported bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Period {
    Week,
    Month,
    Year,
}

impl Period {
    pub fn column(&self) -> &'static str {
        match self {
            Period::Week => "n_week",
            Period::Month => "n_month",
            Period::Year => "n_year",
        }
    }
}

/// Earth Engine export artifacts that never belong in the output.
const IGNORED_COLUMNS: [&str; 2] = ["system:index", ".geo"];

pub fn chirps(input: PathBuf, period: Option<Period>, out_dir: Option<PathBuf>) -> Result<String> {
    let mut reader = csv::Reader::from_path(&input)?;
    let headers = reader.headers()?.clone();

    let mut layout = Layout::from_headers(&headers)?;
    let period = match period {
        Some(period) => period,
        None => layout.detect_period()?,
    };
    // Some exports already carry an `n_year` property; the melted
    // period column replaces it instead of duplicating the header.
    layout.drop_id_column(&headers, period.column());

    let file_path = make_output_file_name("chirps_pr_mm_long", "csv", out_dir.as_deref());
    let mut writer = csv::Writer::from_path(&file_path)?;

    let mut out_headers: Vec<&str> = layout.id_columns.iter().map(|&i| &headers[i]).collect();
    out_headers.push(period.column());
    out_headers.push("pr_mm");
    writer.write_record(&out_headers)?;

    for record in reader.records() {
        let record = record?;
        melt_record(&record, &layout, &mut writer)?;
    }
    writer.flush()?;

    Ok(file_path.to_string_lossy().to_string())
}

/// Column classification of the export: identifier columns carried
/// through, band columns melted.
struct Layout {
    id_columns: Vec<usize>,
    /// (column index, band number).
    band_columns: Vec<(usize, u32)>,
}

impl Layout {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut id_columns = Vec::new();
        let mut band_columns = Vec::new();

        for (i, header) in headers.iter().enumerate() {
            if IGNORED_COLUMNS.contains(&header) {
                continue;
            }
            if !header.is_empty() && header.bytes().all(|b| b.is_ascii_digit()) {
                band_columns.push((i, header.parse()?));
            } else {
                id_columns.push(i);
            }
        }

        if band_columns.is_empty() {
            bail!("no band columns found in export headers");
        }

        Ok(Layout {
            id_columns,
            band_columns,
        })
    }

    fn drop_id_column(&mut self, headers: &StringRecord, name: &str) {
        self.id_columns.retain(|&i| &headers[i] != name);
    }

    fn detect_period(&self) -> Result<Period> {
        // A year band is written as the full year (`2023`), period
        // bands as zero-padded ordinals.
        if self.band_columns.iter().any(|(_, band)| *band > 1000) {
            return Ok(Period::Year);
        }

        let max_band = self
            .band_columns
            .iter()
            .map(|(_, band)| *band)
            .max()
            .ok_or_else(|| anyhow!("no band columns found in export headers"))?;

        if max_band > 12 {
            Ok(Period::Week)
        } else {
            Ok(Period::Month)
        }
    }
}

fn melt_record<W: std::io::Write>(
    record: &StringRecord,
    layout: &Layout,
    writer: &mut csv::Writer<W>,
) -> Result<()> {
    for (column, band) in &layout.band_columns {
        let value = record
            .get(*column)
            .ok_or_else(|| anyhow!("record is shorter than the header row"))?;

        // Regions outside raster coverage export as empty cells; keep
        // them empty rather than coercing to zero.
        if !value.is_empty() && value.parse::<f64>().is_err() {
            bail!("band `{:02}` holds a non-numeric value `{}`", band, value);
        }

        let band_text = band.to_string();
        let mut row: Vec<&str> = layout
            .id_columns
            .iter()
            .map(|&i| record.get(i).unwrap_or_default())
            .collect();
        row.push(&band_text);
        row.push(value);
        writer.write_record(&row)?;
    }

    Ok(())
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn headers(names: &[&str]) -> StringRecord {
        StringRecord::from(names.to_vec())
    }

    #[test]
    fn should_classify_columns() {
        let layout = Layout::from_headers(&headers(&[
            "system:index",
            "cve_geo",
            "nombre",
            "01",
            "02",
            ".geo",
        ]))
        .unwrap();

        assert_eq!(layout.id_columns, vec![1, 2]);
        assert_eq!(layout.band_columns, vec![(3, 1), (4, 2)]);
    }

    #[test]
    fn should_reject_export_without_bands() {
        assert!(Layout::from_headers(&headers(&["cve_geo", "nombre"])).is_err());
    }

    #[test]
    fn should_detect_monthly_bands() {
        let names: Vec<String> = (1..=12).map(|m| format!("{:02}", m)).collect();
        let mut all: Vec<&str> = vec!["cve_geo"];
        all.extend(names.iter().map(String::as_str));

        let layout = Layout::from_headers(&headers(&all)).unwrap();
        assert_eq!(layout.detect_period().unwrap(), Period::Month);
    }

    #[test]
    fn should_detect_weekly_bands() {
        let names: Vec<String> = (1..=52).map(|w| format!("{:02}", w)).collect();
        let mut all: Vec<&str> = vec!["cve_geo"];
        all.extend(names.iter().map(String::as_str));

        let layout = Layout::from_headers(&headers(&all)).unwrap();
        assert_eq!(layout.detect_period().unwrap(), Period::Week);
    }

    #[test]
    fn should_detect_yearly_band() {
        let layout = Layout::from_headers(&headers(&["cve_geo", "2023"])).unwrap();
        assert_eq!(layout.detect_period().unwrap(), Period::Year);
    }

    #[test]
    fn should_melt_export_to_long_format() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("chirps_pr_mm_ent_month_2023.csv");

        std::fs::write(
            &input,
            "system:index,cve_geo,nombre,01,02,.geo\n\
             0,01,Aguascalientes,12.5,30.1,{}\n\
             1,02,Baja California,4.2,,{}\n",
        )
        .unwrap();

        let message = chirps(input, None, Some(dir.path().to_path_buf())).unwrap();
        let text = std::fs::read_to_string(&message).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "cve_geo,nombre,n_month,pr_mm");
        assert_eq!(lines[1], "01,Aguascalientes,1,12.5");
        assert_eq!(lines[2], "01,Aguascalientes,2,30.1");
        assert_eq!(lines[3], "02,Baja California,1,4.2");
        // Missing coverage stays empty, not zero.
        assert_eq!(lines[4], "02,Baja California,2,");
    }

    #[test]
    fn should_not_duplicate_year_column() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("chirps_pr_mm_ent_year_2023.csv");

        std::fs::write(
            &input,
            "cve_geo,nombre,n_year,2023\n\
             01,Aguascalientes,2023,512.7\n",
        )
        .unwrap();

        let message = chirps(input, None, Some(dir.path().to_path_buf())).unwrap();
        let text = std::fs::read_to_string(&message).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "cve_geo,nombre,n_year,pr_mm");
        assert_eq!(lines[1], "01,Aguascalientes,2023,512.7");
    }

    #[test]
    fn should_reject_non_numeric_band_value() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("chirps.csv");

        std::fs::write(&input, "cve_geo,01\n01,lluvia\n").unwrap();

        assert!(chirps(input, None, Some(dir.path().to_path_buf())).is_err());
    }
}
