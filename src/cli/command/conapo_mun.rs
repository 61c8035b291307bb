//! Combine the CONAPO municipal projection bases.
//!
//! The municipal projection ships split across two Latin-1 CSV files.
//! Two outputs: the tidy per-age-band table and the population totals
//! per municipality with gender pivoted to columns.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Result};
use encoding_rs::WINDOWS_1252;
use serde::Serialize;

use crate::{
    cli::create_spinner,
    export,
    reading::{
        conapo::{pad_cve_ent, MunProjection, RawMunRow},
        entidades,
    },
};

use super::make_output_file_name;

const BASE_FILES: [&str; 2] = [
    "base_municipios_final_datos_01.csv",
    "base_municipios_final_datos_02.csv",
];

/// Totals per municipality and year, age bands summed.
#[derive(Debug, Clone, Serialize)]
pub struct MunTotals {
    pub date_year: u16,
    pub nombre_estado: String,
    pub cve_ent: String,
    pub nombre_municipio: String,
    pub cve_mun: String,
    pub hombres: f64,
    pub mujeres: f64,
    pub total: f64,
}

pub fn conapo_mun(data_dir: PathBuf, out_dir: Option<PathBuf>) -> Result<String> {
    let bar = create_spinner("Reading municipal projection bases...".to_string());
    let mut raw = Vec::new();
    for file in BASE_FILES {
        raw.extend(read_base(&data_dir.join(file))?);
    }
    bar.finish_with_message(format!("{} rows read", raw.len()));

    let records = tidy_records(raw)?;
    let totals = totals_by_municipality(&records)?;

    let all_path = make_output_file_name(
        "conapo_proyecciones_mun_2015-2030_all",
        "csv",
        out_dir.as_deref(),
    );
    let totals_path =
        make_output_file_name("conapo_proyecciones_mun_2015-2030", "csv", out_dir.as_deref());

    export::write_rows(&records, &all_path)?;
    export::write_rows(&totals, &totals_path)?;

    Ok(format!(
        "`{}` and `{}`",
        all_path.to_string_lossy(),
        totals_path.to_string_lossy()
    ))
}

/// Reads one published base, decoding from Latin-1.
fn read_base(path: &Path) -> Result<Vec<RawMunRow>> {
    let bytes = fs::read(path)?;
    let (text, _, had_errors) = WINDOWS_1252.decode(&bytes);
    if had_errors {
        bail!("{} is not valid Latin-1", path.display());
    }

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<RawMunRow>, csv::Error>>()?;

    Ok(rows)
}

fn tidy_records(raw: Vec<RawMunRow>) -> Result<Vec<MunProjection>> {
    raw.into_iter()
        .map(|row| {
            let cve_ent = pad_cve_ent(row.clave_ent);
            let nombre_estado = entidades::common_name(&cve_ent)
                .ok_or_else(|| anyhow!("unknown state code `{}`", cve_ent))?;

            Ok(MunProjection::from_raw(row, nombre_estado))
        })
        .collect()
}

/// Sums the age bands away and pivots gender into columns.
fn totals_by_municipality(records: &[MunProjection]) -> Result<Vec<MunTotals>> {
    let mut totals: BTreeMap<(u16, String), MunTotals> = BTreeMap::new();

    for record in records {
        let key = (record.date_year, record.cve_mun.clone());
        let entry = totals.entry(key).or_insert_with(|| MunTotals {
            date_year: record.date_year,
            nombre_estado: record.nombre_estado.clone(),
            cve_ent: record.cve_ent.clone(),
            nombre_municipio: record.nombre_municipio.clone(),
            cve_mun: record.cve_mun.clone(),
            hombres: 0.0,
            mujeres: 0.0,
            total: 0.0,
        });

        match record.genero.as_str() {
            "Hombres" => entry.hombres += record.poblacion_proyectada,
            "Mujeres" => entry.mujeres += record.poblacion_proyectada,
            other => bail!("unknown gender label `{}`", other),
        }
        entry.total += record.poblacion_proyectada;
    }

    Ok(totals.into_values().collect())
}

// -- Tests -------------------------------------------------------------------
