//! Primary content selection and extraction from staged archives.
//!
//! Among the archive members with the recognized content extension, the
//! primary content file is the one with the largest uncompressed size;
//! ties resolve to the first member in archive order.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;
use zip::ZipArchive;

use super::naming::CONTENT_EXTENSION;

/// The extracted primary content file.
#[derive(Debug)]
pub(crate) struct PrimaryContent {
    /// Member name inside the archive.
    pub name: String,
    /// Fully materialized content bytes.
    pub bytes: Vec<u8>,
}

/// Failures scanning a staged archive, without URL context (the pipeline
/// attaches it).
#[derive(Debug, Error)]
pub(crate) enum ArchiveScanError {
    /// The container is unreadable or a member is corrupt.
    #[error("container is unreadable: {0}")]
    Corrupt(#[from] zip::result::ZipError),

    /// The staged file itself could not be read.
    #[error("IO error reading staged archive: {0}")]
    Io(#[from] std::io::Error),
}

/// Opens the staged archive and extracts its primary content file.
///
/// Returns `Ok(None)` when no member carries the recognized extension.
pub(crate) fn extract_primary_content(
    path: &Path,
) -> Result<Option<PrimaryContent>, ArchiveScanError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut best: Option<(usize, u64)> = None;
    for index in 0..archive.len() {
        let member = archive.by_index(index)?;
        if !member
            .name()
            .to_ascii_lowercase()
            .ends_with(CONTENT_EXTENSION)
        {
            continue;
        }
        let size = member.size();
        if best.is_none_or(|(_, best_size)| size > best_size) {
            best = Some((index, size));
        }
    }

    let Some((index, size)) = best else {
        return Ok(None);
    };

    let mut member = archive.by_index(index)?;
    let mut bytes = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
    member.read_to_end(&mut bytes)?;
    Ok(Some(PrimaryContent {
        name: member.name().to_string(),
        bytes,
    }))
}
