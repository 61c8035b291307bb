//! Drought monitor (MSM) records: categories, wide sheet rows and the
//! tidy observation that the rest of the pipeline works with.
//!
//! The CONAGUA workbook has one row per municipality. The first nine
//! columns identify it; every remaining column is a monitor date whose
//! cell holds a drought category (`D0`..`D4`, blank for no drought).

use anyhow::{anyhow, bail, Result};
use calamine::{Data, DataType};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{cell_to_string, cell_to_u32};

/// Number of identifier columns before the date columns start.
pub const ID_COLUMNS: usize = 9;

/// Drought severity category of the Monitor de Sequía de México.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DroughtCategory {
    SinSequia,
    D0,
    D1,
    D2,
    D3,
    D4,
}

impl DroughtCategory {
    /// Parses a monitor cell. Blank cells are `Sin sequia` records.
    pub fn from_cell(text: &str) -> Result<Self> {
        match text.trim() {
            "" | "Sin sequia" => Ok(Self::SinSequia),
            "D0" => Ok(Self::D0),
            "D1" => Ok(Self::D1),
            "D2" => Ok(Self::D2),
            "D3" => Ok(Self::D3),
            "D4" => Ok(Self::D4),
            other => bail!("unknown drought category `{}`", other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SinSequia => "Sin sequia",
            Self::D0 => "D0",
            Self::D1 => "D1",
            Self::D2 => "D2",
            Self::D3 => "D3",
            Self::D4 => "D4",
        }
    }
}

impl std::fmt::Display for DroughtCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DroughtCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DroughtCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_cell(&text).map_err(serde::de::Error::custom)
    }
}

/// One municipality row of the wide monitor sheet.
#[derive(Debug, Clone)]
pub struct MsmWideRecord {
    pub cve_concatenada: u32,
    pub cve_ent: String,
    pub cve_mun: String,
    pub nombre_mun: String,
    pub nombre_ent: String,
    /// One category per date column, in sheet order.
    pub values: Vec<DroughtCategory>,
}

impl MsmWideRecord {
    pub fn from_row(row: &[Data]) -> Result<Self> {
        if row.len() < ID_COLUMNS {
            bail!("expected at least {} identifier columns, got {}", ID_COLUMNS, row.len());
        }

        let cve_concatenada = cell_to_u32(&row[0])?;
        let cve_ent = format!("{:02}", cell_to_u32(&row[1])?);
        let cve_mun = format!("{:03}", cell_to_u32(&row[2])?);
        let nombre_mun = cell_to_string(&row[3]);
        let nombre_ent = cell_to_string(&row[4]);

        let values = row[ID_COLUMNS..]
            .iter()
            .map(|cell| DroughtCategory::from_cell(&cell_to_string(cell)))
            .collect::<Result<Vec<_>>>()?;

        Ok(MsmWideRecord {
            cve_concatenada,
            cve_ent,
            cve_mun,
            nombre_mun,
            nombre_ent,
            values,
        })
    }
}

/// One tidy (municipality, date) observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroughtObservation {
    pub cve_concatenada: u32,
    pub cve_ent: String,
    pub cve_mun: String,
    pub nombre_mun: String,
    pub nombre_ent: String,
    pub full_date: NaiveDate,
    pub sequia: DroughtCategory,
}

/// Parses a date column header.
///
/// The workbook has carried two header styles over the years: real Excel
/// datetimes and text such as `2003_08_15_00_00_00` or `2003-08-15`.
pub fn parse_date_header(cell: &Data) -> Result<NaiveDate> {
    if let Some(dt) = cell.as_datetime() {
        return Ok(dt.date());
    }

    let text = cell_to_string(cell);
    let cleaned = text.trim().trim_end_matches("_00_00_00").replace('_', "-");
    NaiveDate::parse_from_str(&cleaned, "%Y-%m-%d")
        .map_err(|_| anyhow!("cannot parse date header `{}`", text))
}

// -- Tests -------------------------------------------------------------------
