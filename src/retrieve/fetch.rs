//! Streaming archive fetch into a temporary file.
//!
//! The archive lands in a `NamedTempFile` next to its final output
//! directory; the handle's RAII delete covers every exit path, so a
//! failed or abandoned fetch never leaves stray bytes behind.

use std::path::Path;

use futures_util::StreamExt;
use tempfile::NamedTempFile;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use super::error::ProcessError;

/// Streams the archive at `url` into a temp file inside `dir`.
///
/// Returns the live temp handle; dropping it removes the file.
pub(crate) async fn fetch_to_temp(
    client: &reqwest::Client,
    url: &str,
    dir: &Path,
) -> Result<NamedTempFile, ProcessError> {
    debug!(url = %url, "fetching archive");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ProcessError::fetch(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProcessError::fetch_status(url, status.as_u16()));
    }

    let temp = NamedTempFile::new_in(dir).map_err(|e| ProcessError::io(dir, e))?;
    let std_handle = temp
        .reopen()
        .map_err(|e| ProcessError::io(temp.path(), e))?;
    let mut writer = BufWriter::new(tokio::fs::File::from_std(std_handle));

    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;
    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| ProcessError::fetch(url, e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| ProcessError::io(temp.path(), e))?;
        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| ProcessError::io(temp.path(), e))?;

    debug!(bytes = bytes_written, "archive staged");
    Ok(temp)
}
