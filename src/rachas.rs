//! Drought run (racha) detection.
//!
//! A racha is a maximal run of consecutive identical drought-category
//! observations for one municipality. The monitor is published twice a
//! month, so a run is reported both as an observation count (`racha`)
//! and as a calendar span in days (`racha_dias`).

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::reading::DroughtCategory;

#[derive(Debug, Clone, PartialEq)]
pub struct Racha {
    pub cve_concatenada: u32,
    pub sequia: DroughtCategory,
    /// Number of consecutive observations in the run.
    pub racha: u32,
    pub full_date_start_racha: NaiveDate,
    pub full_date_end_racha: NaiveDate,
}

impl Racha {
    /// Calendar span of the run in days.
    pub fn racha_dias(&self) -> i64 {
        (self.full_date_end_racha - self.full_date_start_racha).num_days()
    }
}

impl Serialize for Racha {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_struct("Racha", 6)?;
        row.serialize_field("cve_concatenada", &self.cve_concatenada)?;
        row.serialize_field("sequia", &self.sequia)?;
        row.serialize_field("racha", &self.racha)?;
        row.serialize_field("full_date_start_racha", &self.full_date_start_racha)?;
        row.serialize_field("full_date_end_racha", &self.full_date_end_racha)?;
        row.serialize_field("racha_dias", &self.racha_dias())?;
        row.end()
    }
}

/// Scans one municipality's chronologically ordered series and returns
/// its runs in order. The final open run is always emitted.
pub fn count_runs(
    cve_concatenada: u32,
    series: &[(NaiveDate, DroughtCategory)],
) -> Vec<Racha> {
    let mut runs = Vec::new();
    let Some(first) = series.first() else {
        return runs;
    };

    let mut start = 0;
    let mut current = first.1;

    for (i, (_, sequia)) in series.iter().enumerate().skip(1) {
        if *sequia != current {
            runs.push(make_run(cve_concatenada, current, &series[start..i]));
            start = i;
            current = *sequia;
        }
    }
    runs.push(make_run(cve_concatenada, current, &series[start..]));

    runs
}

fn make_run(
    cve_concatenada: u32,
    sequia: DroughtCategory,
    window: &[(NaiveDate, DroughtCategory)],
) -> Racha {
    Racha {
        cve_concatenada,
        sequia,
        racha: window.len() as u32,
        full_date_start_racha: window[0].0,
        full_date_end_racha: window[window.len() - 1].0,
    }
}

/// Selects the longest run of each category present, by calendar span.
/// Ties keep the earliest run. Results are ordered by category.
pub fn max_runs_per_category(runs: &[Racha]) -> Vec<Racha> {
    let mut best: HashMap<DroughtCategory, &Racha> = HashMap::new();

    for run in runs {
        match best.get(&run.sequia) {
            Some(current) if current.racha_dias() >= run.racha_dias() => {}
            _ => {
                best.insert(run.sequia, run);
            }
        }
    }

    let mut maxima: Vec<Racha> = best.into_values().cloned().collect();
    maxima.sort_by_key(|run| run.sequia);

    maxima
}

// -- Tests -------------------------------------------------------------------
