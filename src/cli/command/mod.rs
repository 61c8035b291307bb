pub mod chirps;
pub mod conapo_ent;
pub mod conapo_mun;
pub mod msm;
pub mod rachas;

use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use clap::ValueEnum;

pub use chirps::chirps;
pub use conapo_ent::conapo_ent;
pub use conapo_mun::conapo_mun;
pub use msm::msm;
pub use rachas::rachas;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    CsvGz,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::CsvGz => "csv.gz",
            OutputFormat::Parquet => "parquet",
        }
    }
}

/// Builds `<name>-YYYY-MM-DD.<ext>` in `out_dir`, defaulting to the
/// home directory.
pub fn make_output_file_name(name: &str, extension: &str, out_dir: Option<&Path>) -> PathBuf {
    let today = Local::now();
    let file_name = format!(
        "{}-{}-{:02}-{:02}.{}",
        name,
        today.year(),
        today.month(),
        today.day(),
        extension
    );

    match out_dir {
        Some(dir) => dir.join(file_name),
        None => dirs::home_dir().unwrap().join(file_name),
    }
}

// -- Tests -------------------------------------------------------------------
