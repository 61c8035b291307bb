pub mod conapo;
pub mod entidades;
pub mod msm;

use anyhow::{anyhow, Result};
use calamine::{Data, DataType};

pub use msm::{DroughtCategory, DroughtObservation, MsmWideRecord};

pub(crate) fn cell_to_u32(cell: &Data) -> Result<u32> {
    if let Some(v) = cell.as_i64() {
        return Ok(u32::try_from(v)?);
    }
    let text = cell_to_string(cell);
    text.trim()
        .parse()
        .map_err(|_| anyhow!("cannot parse `{}` as a numeric code", text))
}

pub(crate) fn cell_to_u64(cell: &Data) -> Result<u64> {
    if let Some(v) = cell.as_i64() {
        return Ok(u64::try_from(v)?);
    }
    let text = cell_to_string(cell);
    text.trim()
        .parse()
        .map_err(|_| anyhow!("cannot parse `{}` as a count", text))
}

pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.as_string().unwrap_or_default(),
    }
}
