//! Downloads the published source files.

use std::{fs::File, io::Write, path::PathBuf};

use anyhow::{Error, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};

/// Downloads the file at `url` to `file_path`, streaming chunks to disk
/// and driving the progress bar when the server reports a length.
pub async fn download_file(url: &str, file_path: PathBuf, progress_bar: ProgressBar) -> Result<()> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| Error::msg(format!("Failed to download file: {}", e)))?;

    if !response.status().is_success() {
        return Err(Error::msg(format!(
            "Failed to download file: {}",
            response.status()
        )));
    }

    let total_size = response.content_length().unwrap_or(0);
    if total_size > 0 {
        progress_bar.set_length(total_size);
        progress_bar.set_style(
            ProgressStyle::with_template(
                "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {eta}",
            )
            .unwrap()
            .progress_chars("=> "),
        );
    }

    let mut file = File::create(file_path)?;
    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| Error::msg(format!("Error reading chunk: {}", e)))?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        progress_bar.set_position(downloaded);
    }

    Ok(())
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_spinner_to_progress_bar() {
        let pb = ProgressBar::new_spinner().with_message("Downloading...");

        // The same conversion download_file applies once the length is known.
        pb.set_length(1000);
        pb.set_style(
            ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes}")
                .unwrap()
                .progress_chars("=> "),
        );
        pb.set_position(500);

        assert_eq!(pb.length().unwrap(), 1000);
        assert_eq!(pb.position(), 500);
    }
}
