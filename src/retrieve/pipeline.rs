//! The per-entry retrieval pipeline: fetch, extract, hash, persist.

use std::path::PathBuf;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use crate::catalog::{ArchiveReference, CatalogEntry};

use super::RetrievedContent;
use super::archive::{ArchiveScanError, extract_primary_content};
use super::error::ProcessError;
use super::fetch::fetch_to_temp;
use super::naming::{book_id, class_dir, content_filename};

/// HTTP connect timeout for archive fetches (30 seconds).
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// HTTP read timeout for archive fetches (5 minutes for large archives).
const READ_TIMEOUT_SECS: u64 = 300;

/// Identifying User-Agent for archive fetch traffic.
fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("harvester/{version} (book-archival-tool)")
}

/// Processes one entry at a time: fetch the archive, extract the primary
/// content file, hash it, and store it under the deterministic output path.
///
/// The pipeline retains nothing across entries except the returned
/// [`RetrievedContent`] values.
#[derive(Debug, Clone)]
pub struct RetrievalPipeline {
    client: reqwest::Client,
    output_root: PathBuf,
}

impl RetrievalPipeline {
    /// Creates a pipeline writing under `output_root`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .gzip(true)
            .user_agent(default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self {
            client,
            output_root: output_root.into(),
        }
    }

    /// Fetches, extracts, and stores one entry's content.
    ///
    /// # Errors
    ///
    /// Every failure is per-entry and skippable: [`ProcessError::Fetch`] /
    /// [`ProcessError::FetchStatus`] on transport or status problems,
    /// [`ProcessError::Archive`] on an unreadable container,
    /// [`ProcessError::NoContent`] when nothing inside carries the
    /// recognized extension, and [`ProcessError::Io`] on staging or write
    /// failures. The staged temp file is removed on every exit path, and
    /// the output path is only touched once content bytes are fully in
    /// memory.
    #[instrument(skip(self, entry, reference), fields(title = %entry.title))]
    pub async fn process(
        &self,
        entry: &CatalogEntry,
        reference: &ArchiveReference,
    ) -> Result<RetrievedContent, ProcessError> {
        let url = reference.as_str();
        let id = book_id(entry);
        let dir = class_dir(&self.output_root, entry.class);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ProcessError::io(&dir, e))?;
        let content_path = dir.join(content_filename(entry));

        let staged = fetch_to_temp(&self.client, url, &dir).await?;

        let staged_path = staged.path().to_path_buf();
        let scan = tokio::task::spawn_blocking(move || extract_primary_content(&staged_path))
            .await
            .map_err(|e| ProcessError::io(staged.path(), std::io::Error::other(e)))?;

        let primary = match scan {
            Ok(Some(primary)) => primary,
            Ok(None) => return Err(ProcessError::no_content(url)),
            Err(ArchiveScanError::Corrupt(source)) => {
                return Err(ProcessError::archive(url, source));
            }
            Err(ArchiveScanError::Io(source)) => {
                return Err(ProcessError::io(staged.path(), source));
            }
        };
        debug!(
            member = %primary.name,
            bytes = primary.bytes.len(),
            "primary content extracted"
        );

        let mut hasher = Sha256::new();
        hasher.update(&primary.bytes);
        let sha256 = format!("{:x}", hasher.finalize());

        tokio::fs::write(&content_path, &primary.bytes)
            .await
            .map_err(|e| ProcessError::io(&content_path, e))?;

        info!(id = %id, path = %content_path.display(), "content stored");
        Ok(RetrievedContent {
            book_id: id,
            content_path,
            sha256,
        })
    }
}
