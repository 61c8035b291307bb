mod cli;
mod download;
mod export;
mod rachas;
mod reading;
mod tidy;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{command, Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Msm {
            input,
            format,
            out_dir,
        } => match command::msm(input, format, out_dir).await {
            Ok(filename) => println!("File saved to `{}`", filename),
            Err(e) => eprintln!("Error: {}", e),
        },
        Commands::Rachas { input, out_dir } => match command::rachas(input, out_dir).await {
            Ok(filenames) => println!("Files saved to {}", filenames),
            Err(e) => eprintln!("Error: {}", e),
        },
        Commands::ConapoEnt { data_dir, out_dir } => match command::conapo_ent(data_dir, out_dir) {
            Ok(filename) => println!("File saved to `{}`", filename),
            Err(e) => eprintln!("Error: {}", e),
        },
        Commands::ConapoMun { data_dir, out_dir } => match command::conapo_mun(data_dir, out_dir) {
            Ok(filenames) => println!("Files saved to {}", filenames),
            Err(e) => eprintln!("Error: {}", e),
        },
        Commands::Chirps {
            input,
            period,
            out_dir,
        } => match command::chirps(input, period, out_dir) {
            Ok(filename) => println!("File saved to `{}`", filename),
            Err(e) => eprintln!("Error: {}", e),
        },
    }

    Ok(())
}
