//! Handles serialising tables to disk (CSV, gzipped CSV and parquet).

pub mod csv;
pub mod parquet;

pub use self::csv::{read_rows, write_rows};
pub use self::parquet::save_observations;
