//! Wide-to-long reshaping of the monitor sheet.

use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};

use crate::reading::{DroughtObservation, MsmWideRecord};

/// Melts the wide municipality records into one row per
/// (municipality, date), dropping the dates the monitor skipped.
///
/// Every record must carry one value per date header.
///
/// The workbook notes state that the monitor was not produced in
/// August 2003 and February 2004; those columns carry stale values and
/// are excluded.
pub fn melt(records: &[MsmWideRecord], dates: &[NaiveDate]) -> Result<Vec<DroughtObservation>> {
    let mut observations = Vec::with_capacity(records.len() * dates.len());

    for record in records {
        if record.values.len() != dates.len() {
            bail!(
                "municipality {} has {} values for {} date columns",
                record.cve_concatenada,
                record.values.len(),
                dates.len()
            );
        }
        for (date, sequia) in dates.iter().zip(&record.values) {
            if is_skipped_date(*date) {
                continue;
            }
            observations.push(DroughtObservation {
                cve_concatenada: record.cve_concatenada,
                cve_ent: record.cve_ent.clone(),
                cve_mun: record.cve_mun.clone(),
                nombre_mun: record.nombre_mun.clone(),
                nombre_ent: record.nombre_ent.clone(),
                full_date: *date,
                sequia: *sequia,
            });
        }
    }

    Ok(observations)
}

fn is_skipped_date(date: NaiveDate) -> bool {
    (date.year() == 2003 && date.month() == 8) || (date.year() == 2004 && date.month() == 2)
}

// -- Tests -------------------------------------------------------------------
