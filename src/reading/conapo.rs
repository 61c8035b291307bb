//! CONAPO population projection records.
//!
//! Two sources with different shapes: the municipal bases (two Latin-1
//! CSV files, 2015-2030) and the state-level workbooks (start-of-year
//! and mid-year population, 1950-2070).

use anyhow::{bail, Result};
use calamine::Data;
use serde::{Deserialize, Serialize};

use super::{cell_to_string, cell_to_u32, cell_to_u64};

/// One row of `base_municipios_final_datos_0*.csv` as published.
#[derive(Debug, Deserialize)]
pub struct RawMunRow {
    #[serde(rename = "CLAVE")]
    pub clave: u32,
    #[serde(rename = "CLAVE_ENT")]
    pub clave_ent: u32,
    #[serde(rename = "MUN")]
    pub mun: String,
    #[serde(rename = "SEXO")]
    pub sexo: String,
    #[serde(rename = "AÑO")]
    pub anio: u16,
    #[serde(rename = "EDAD_QUIN")]
    pub edad_quin: String,
    #[serde(rename = "POB")]
    pub pob: f64,
}

/// One tidy municipal projection row.
#[derive(Debug, Clone, Serialize)]
pub struct MunProjection {
    pub date_year: u16,
    pub nombre_estado: String,
    pub cve_ent: String,
    pub nombre_municipio: String,
    pub cve_mun: String,
    pub rango_edad: String,
    pub genero: String,
    /// Projected population. Kept as published: the projection model
    /// emits fractional counts.
    pub poblacion_proyectada: f64,
}

impl MunProjection {
    pub fn from_raw(raw: RawMunRow, nombre_estado: &str) -> Self {
        MunProjection {
            date_year: raw.anio,
            nombre_estado: nombre_estado.to_string(),
            cve_ent: pad_cve_ent(raw.clave_ent),
            nombre_municipio: raw.mun,
            cve_mun: pad_cve_mun(raw.clave),
            rango_edad: clean_age_band(&raw.edad_quin),
            genero: raw.sexo,
            poblacion_proyectada: raw.pob,
        }
    }
}

/// One row of the state-level workbooks
/// (`RENGLON`, `AÑO`, `ENTIDAD`, `CVE_GEO`, `EDAD`, `SEXO`, `POBLACION`).
#[derive(Debug, Clone)]
pub struct EntRow {
    pub n_year: u16,
    pub cve_ent: String,
    pub edad: u16,
    pub genero: String,
    pub poblacion: u64,
}

impl EntRow {
    pub fn from_row(row: &[Data]) -> Result<Self> {
        if row.len() < 7 {
            bail!("expected 7 columns in projection workbook row, got {}", row.len());
        }

        Ok(EntRow {
            n_year: cell_to_u32(&row[1])? as u16,
            cve_ent: pad_cve_ent(cell_to_u32(&row[3])?),
            edad: cell_to_u32(&row[4])? as u16,
            genero: cell_to_string(&row[5]),
            poblacion: cell_to_u64(&row[6])?,
        })
    }

    /// Join key used to match the mid-year workbook onto start-of-year.
    pub fn key(&self) -> (u16, String, u16, String) {
        (self.n_year, self.cve_ent.clone(), self.edad, self.genero.clone())
    }
}

/// One output row of the combined state-level projection.
#[derive(Debug, Clone, Serialize)]
pub struct EntProjection {
    pub n_year: u16,
    pub nombre_estado: String,
    pub cve_ent: String,
    pub edad: u16,
    pub genero: String,
    pub pob_start_year: u64,
    pub pob_mid_year: Option<u64>,
}

/// Zero-pads a state code to two digits (`4` -> `"04"`).
pub fn pad_cve_ent(cve: u32) -> String {
    format!("{:02}", cve)
}

/// Zero-pads a municipality code to five digits (`1001` -> `"01001"`).
pub fn pad_cve_mun(cve: u32) -> String {
    format!("{:05}", cve)
}

/// Rewrites the published age bands: `pobm_00_04` -> `00-04`.
pub fn clean_age_band(raw: &str) -> String {
    raw.replace("pobm_", "").replace('_', "-")
}

// -- Tests -------------------------------------------------------------------
