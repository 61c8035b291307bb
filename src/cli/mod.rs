//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use clap::{command, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use command::{chirps::Period, OutputFormat};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download and tidy the municipal drought monitor (MSM) record
    Msm {
        /// Read a local copy of MunicipiosSequia.xlsx instead of downloading
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output format for the tidy table
        #[arg(long, value_enum, default_value = "csv")]
        format: OutputFormat,
        /// Directory for the output file (defaults to the home directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Compute drought runs and maximum runs per municipality
    Rachas {
        /// Tidy monitor table (.csv or .csv.gz) produced by `msm`
        input: PathBuf,
        /// Directory for the output files (defaults to the home directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Combine the CONAPO state-level projection workbooks (1950-2070)
    ConapoEnt {
        /// Directory holding 0_Pob_Inicio_1950_2070.xlsx and 0_Pob_Mitad_1950_2070.xlsx
        data_dir: PathBuf,
        /// Directory for the output file (defaults to the home directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Combine the CONAPO municipal projection bases (2015-2030)
    ConapoMun {
        /// Directory holding base_municipios_final_datos_01.csv and _02.csv
        data_dir: PathBuf,
        /// Directory for the output files (defaults to the home directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Melt a CHIRPS table exported from Earth Engine into long format
    Chirps {
        /// Band-column CSV exported by the raster2csv job
        input: PathBuf,
        /// Force the period kind instead of detecting it from the headers
        #[arg(long, value_enum)]
        period: Option<Period>,
        /// Directory for the output file (defaults to the home directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    ProgressBar::new(size).with_message(message).with_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    )
}
