//! Combine the CONAPO state-level projection workbooks.
//!
//! Start-of-year and mid-year population are published as two separate
//! workbooks with the same shape; the output is one row per
//! (year, state, age, gender) carrying both figures.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Result};
use calamine::{open_workbook, Reader, Xlsx};

use crate::{
    cli::create_spinner,
    export,
    reading::{
        conapo::{EntProjection, EntRow},
        entidades,
    },
};

use super::make_output_file_name;

const INICIO_FILE: &str = "0_Pob_Inicio_1950_2070.xlsx";
const MITAD_FILE: &str = "0_Pob_Mitad_1950_2070.xlsx";

pub fn conapo_ent(data_dir: PathBuf, out_dir: Option<PathBuf>) -> Result<String> {
    let bar = create_spinner("Reading projection workbooks...".to_string());
    let inicio = read_workbook_rows(&data_dir.join(INICIO_FILE))?;
    let mitad = read_workbook_rows(&data_dir.join(MITAD_FILE))?;
    bar.finish_with_message(format!("{} start-of-year rows read", inicio.len()));

    let combined = combine(inicio, mitad)?;

    let file_path = make_output_file_name(
        "conapo_proyecciones_ent-nac_inicio-mitad_1950-2070",
        "csv",
        out_dir.as_deref(),
    );
    export::write_rows(&combined, &file_path)?;

    Ok(file_path.to_string_lossy().to_string())
}

fn read_workbook_rows(path: &Path) -> Result<Vec<EntRow>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("workbook {} has no sheets", path.display()))?;
    let range = workbook.worksheet_range(&sheet_name)?;

    range
        .rows()
        .skip(1) // header row
        .map(EntRow::from_row)
        .collect()
}

/// Left-joins mid-year population onto the start-of-year rows and
/// replaces the official state names with common names.
fn combine(inicio: Vec<EntRow>, mitad: Vec<EntRow>) -> Result<Vec<EntProjection>> {
    let mid_lookup: HashMap<_, _> = mitad
        .into_iter()
        .map(|row| (row.key(), row.poblacion))
        .collect();

    inicio
        .into_iter()
        .map(|row| {
            let nombre_estado = entidades::common_name(&row.cve_ent)
                .ok_or_else(|| anyhow!("unknown state code `{}`", row.cve_ent))?
                .to_string();
            let pob_mid_year = mid_lookup.get(&row.key()).copied();

            Ok(EntProjection {
                n_year: row.n_year,
                nombre_estado,
                cve_ent: row.cve_ent,
                edad: row.edad,
                genero: row.genero,
                pob_start_year: row.poblacion,
                pob_mid_year,
            })
        })
        .collect()
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ent_row(n_year: u16, cve_ent: &str, edad: u16, genero: &str, poblacion: u64) -> EntRow {
        EntRow {
            n_year,
            cve_ent: cve_ent.to_string(),
            edad,
            genero: genero.to_string(),
            poblacion,
        }
    }

    #[test]
    fn should_join_mid_year_population() {
        let inicio = vec![
            ent_row(2024, "04", 80, "Mujeres", 1007),
            ent_row(2024, "04", 81, "Mujeres", 950),
        ];
        let mitad = vec![ent_row(2024, "04", 80, "Mujeres", 998)];

        let combined = combine(inicio, mitad).unwrap();

        assert_eq!(combined.len(), 2);
        assert_eq!(combined[0].nombre_estado, "Campeche");
        assert_eq!(combined[0].pob_start_year, 1007);
        assert_eq!(combined[0].pob_mid_year, Some(998));
        // Mid-year figure missing for this key stays empty.
        assert_eq!(combined[1].pob_mid_year, None);
    }

    #[test]
    fn should_use_common_state_names() {
        let inicio = vec![ent_row(1950, "05", 0, "Hombres", 10_000)];
        let combined = combine(inicio, Vec::new()).unwrap();

        // `Coahuila de Zaragoza` in the workbook.
        assert_eq!(combined[0].nombre_estado, "Coahuila");
    }

    #[test]
    fn should_reject_unknown_state_code() {
        let inicio = vec![ent_row(1950, "44", 0, "Hombres", 10_000)];
        assert!(combine(inicio, Vec::new()).is_err());
    }
}
