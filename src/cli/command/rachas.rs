//! Compute drought runs from the tidy monitor table.
//!
//! Municipalities are independent, so each one is scanned in its own
//! task and the results joined in municipality order.

use std::{
    collections::BTreeMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::Result;
use chrono::NaiveDate;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    export,
    rachas::{count_runs, max_runs_per_category, Racha},
    reading::{DroughtCategory, DroughtObservation},
};

use super::make_output_file_name;

pub async fn rachas(input: PathBuf, out_dir: Option<PathBuf>) -> Result<String> {
    let observations: Vec<DroughtObservation> = export::read_rows(&input)?;
    let series = group_by_municipality(observations);

    let progress_bar = Arc::new(Mutex::new(
        ProgressBar::new(series.len() as u64).with_message("Scanning municipalities"),
    ));
    progress_bar.lock().unwrap().set_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let tasks: Vec<_> = series
        .into_iter()
        .map(|(cve_concatenada, serie)| {
            let pb = Arc::clone(&progress_bar);
            tokio::spawn(async move {
                let runs = count_runs(cve_concatenada, &serie);
                let maxima = max_runs_per_category(&runs);
                pb.lock().unwrap().inc(1);
                (runs, maxima)
            })
        })
        .collect();

    let mut all_runs: Vec<Racha> = Vec::new();
    let mut all_maxima: Vec<Racha> = Vec::new();
    for result in join_all(tasks).await {
        let (runs, maxima) = result?;
        all_runs.extend(runs);
        all_maxima.extend(maxima);
    }
    progress_bar
        .lock()
        .unwrap()
        .finish_with_message("Scan complete");

    let runs_path = make_output_file_name("rachas_sequia_municipios", "csv", out_dir.as_deref());
    let maxima_path =
        make_output_file_name("max_rachas_sequia_municipios", "csv", out_dir.as_deref());

    export::write_rows(&all_runs, &runs_path)?;
    export::write_rows(&all_maxima, &maxima_path)?;

    Ok(format!(
        "`{}` and `{}`",
        runs_path.to_string_lossy(),
        maxima_path.to_string_lossy()
    ))
}

/// Splits the tidy table into one chronological series per
/// municipality. Rows arrive date-ordered within each municipality,
/// which the scan relies on.
fn group_by_municipality(
    observations: Vec<DroughtObservation>,
) -> BTreeMap<u32, Vec<(NaiveDate, DroughtCategory)>> {
    let mut series: BTreeMap<u32, Vec<(NaiveDate, DroughtCategory)>> = BTreeMap::new();

    for observation in observations {
        series
            .entry(observation.cve_concatenada)
            .or_default()
            .push((observation.full_date, observation.sequia));
    }

    series
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn observation(cve: u32, date: &str, sequia: DroughtCategory) -> DroughtObservation {
        DroughtObservation {
            cve_concatenada: cve,
            cve_ent: format!("{:02}", cve / 1000),
            cve_mun: format!("{:03}", cve % 1000),
            nombre_mun: "Municipio".to_string(),
            nombre_ent: "Estado".to_string(),
            full_date: date.parse().unwrap(),
            sequia,
        }
    }

    #[test]
    fn should_group_series_per_municipality() {
        let observations = vec![
            observation(1001, "2022-01-15", DroughtCategory::D0),
            observation(5035, "2022-01-15", DroughtCategory::D3),
            observation(1001, "2022-01-31", DroughtCategory::D1),
        ];

        let series = group_by_municipality(observations);

        assert_eq!(series.len(), 2);
        assert_eq!(series[&1001].len(), 2);
        assert_eq!(series[&5035].len(), 1);
        // Input order is preserved within a municipality.
        assert_eq!(series[&1001][1].1, DroughtCategory::D1);
    }

    #[tokio::test]
    async fn should_write_runs_and_maxima_files() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("sequia_municipios.csv");

        let observations = vec![
            observation(1001, "2022-01-15", DroughtCategory::D0),
            observation(1001, "2022-01-31", DroughtCategory::D0),
            observation(1001, "2022-02-15", DroughtCategory::D1),
        ];
        export::write_rows(&observations, &input).unwrap();

        let message = rachas(input, Some(dir.path().to_path_buf())).await.unwrap();

        assert!(message.contains("rachas_sequia_municipios"));
        assert!(message.contains("max_rachas_sequia_municipios"));

        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(names.len(), 3);

        let runs_file = names
            .iter()
            .find(|name| name.starts_with("rachas_sequia_municipios"))
            .unwrap();
        let text = std::fs::read_to_string(dir.path().join(runs_file)).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "cve_concatenada,sequia,racha,full_date_start_racha,full_date_end_racha,racha_dias"
        );
        assert_eq!(lines.next().unwrap(), "1001,D0,2,2022-01-15,2022-01-31,16");
        assert_eq!(lines.next().unwrap(), "1001,D1,1,2022-02-15,2022-02-15,0");
    }
}
