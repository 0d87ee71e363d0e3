//! Manifest accumulation and end-of-run persistence.
//!
//! The manifest is the run's only durable output contract: an ordered list
//! of successfully retrieved entries plus a separate id-to-hash index.
//! Records accumulate in memory in processing order and flush exactly once
//! after all entries are processed; an aborted run writes nothing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::catalog::{ArchiveReference, CatalogEntry};
use crate::retrieve::RetrievedContent;

/// Default file name for the catalog-entry manifest.
pub const BOOKS_MANIFEST_FILENAME: &str = "books_to_track.json";

/// Default file name for the id-to-hash index.
pub const HASH_INDEX_FILENAME: &str = "hashes.json";

/// One successfully retrieved book, joined with its originating catalog
/// entry and archive reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Stable identifier derived from (class, subject, title).
    pub id: String,
    /// Class number (1-12).
    pub class: u8,
    /// Subject display name as observed in the interface.
    pub subject: String,
    /// Title display name as observed in the interface.
    pub title: String,
    /// Where the extracted content was stored.
    pub pdf_path: PathBuf,
    /// The archive reference the content was retrieved from.
    pub download_url: String,
}

/// Destinations for the two durable records.
#[derive(Debug, Clone)]
pub struct ManifestPaths {
    /// Catalog-entry manifest destination.
    pub books: PathBuf,
    /// Hash index destination.
    pub hashes: PathBuf,
}

impl ManifestPaths {
    /// Places both records in the given directory under their default
    /// file names.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            books: dir.join(BOOKS_MANIFEST_FILENAME),
            hashes: dir.join(HASH_INDEX_FILENAME),
        }
    }
}

impl Default for ManifestPaths {
    fn default() -> Self {
        Self::in_dir(Path::new("."))
    }
}

/// Errors persisting the manifest. Fatal: the run is incomplete if the
/// flush fails, even though all prior work succeeded.
#[derive(Debug, Error)]
pub enum PersistError {
    /// A record failed to serialize.
    #[error("failed to serialize {record}: {source}")]
    Serialize {
        /// Which record failed ("manifest" or "hash index").
        record: &'static str,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// A record failed to write.
    #[error("failed to write {path}: {source}")]
    Io {
        /// The destination that could not be written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl PersistError {
    fn serialize(record: &'static str, source: serde_json::Error) -> Self {
        Self::Serialize { record, source }
    }

    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Accumulates per-entry results for the life of the run and flushes both
/// durable records at the end.
#[derive(Debug, Default)]
pub struct ManifestWriter {
    entries: Vec<ManifestEntry>,
    hashes: BTreeMap<String, String>,
}

impl ManifestWriter {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one joined record. Ordering is processing order, not sorted.
    pub fn record(
        &mut self,
        entry: &CatalogEntry,
        reference: &ArchiveReference,
        content: &RetrievedContent,
    ) {
        self.entries.push(ManifestEntry {
            id: content.book_id.clone(),
            class: entry.class.ordinal(),
            subject: entry.subject.clone(),
            title: entry.title.clone(),
            pdf_path: content.content_path.clone(),
            download_url: reference.as_str().to_string(),
        });
        self.hashes
            .insert(content.book_id.clone(), content.sha256.clone());
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes both records and writes them to their destinations.
    ///
    /// Consumes the writer: the manifest flushes exactly once per run.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if either record cannot be serialized or
    /// written. The run is considered incomplete on flush failure.
    pub async fn flush(self, paths: &ManifestPaths) -> Result<(), PersistError> {
        let books_json = serde_json::to_vec_pretty(&self.entries)
            .map_err(|e| PersistError::serialize("manifest", e))?;
        let hashes_json = serde_json::to_vec_pretty(&self.hashes)
            .map_err(|e| PersistError::serialize("hash index", e))?;

        tokio::fs::write(&paths.books, books_json)
            .await
            .map_err(|e| PersistError::io(&paths.books, e))?;
        tokio::fs::write(&paths.hashes, hashes_json)
            .await
            .map_err(|e| PersistError::io(&paths.hashes, e))?;

        info!(
            entries = self.entries.len(),
            books = %paths.books.display(),
            hashes = %paths.hashes.display(),
            "manifest flushed"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use crate::catalog::ClassLevel;

    use super::*;

    fn sample(subject: &str, title: &str, hash: &str) -> (CatalogEntry, ArchiveReference, RetrievedContent) {
        let entry = CatalogEntry::new(ClassLevel::Seven, subject, title);
        let reference = ArchiveReference::new(format!("https://catalog.example/{title}.zip"));
        let content = RetrievedContent {
            book_id: crate::retrieve::book_id(&entry),
            content_path: PathBuf::from(format!("downloads/class_7/{title}.pdf")),
            sha256: hash.to_string(),
        };
        (entry, reference, content)
    }

    #[tokio::test]
    async fn test_flush_round_trips_both_records() {
        let dir = TempDir::new().unwrap();
        let paths = ManifestPaths::in_dir(dir.path());

        let mut writer = ManifestWriter::new();
        let (entry, reference, content) = sample("English", "Honeycomb", "abc123");
        writer.record(&entry, &reference, &content);
        writer.flush(&paths).await.unwrap();

        let books: Vec<ManifestEntry> =
            serde_json::from_slice(&std::fs::read(&paths.books).unwrap()).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, "c7_english_honeycomb");
        assert_eq!(books[0].class, 7);
        assert_eq!(books[0].subject, "English");
        assert_eq!(books[0].title, "Honeycomb");
        assert_eq!(
            books[0].download_url,
            "https://catalog.example/Honeycomb.zip"
        );

        let hashes: BTreeMap<String, String> =
            serde_json::from_slice(&std::fs::read(&paths.hashes).unwrap()).unwrap();
        assert_eq!(
            hashes.get("c7_english_honeycomb"),
            Some(&"abc123".to_string())
        );
    }

    #[tokio::test]
    async fn test_entries_keep_processing_order() {
        let dir = TempDir::new().unwrap();
        let paths = ManifestPaths::in_dir(dir.path());

        let mut writer = ManifestWriter::new();
        for (subject, title, hash) in [
            ("Science", "Science", "h1"),
            ("English", "Honeycomb", "h2"),
            ("English", "An Alien Hand", "h3"),
        ] {
            let (entry, reference, content) = sample(subject, title, hash);
            writer.record(&entry, &reference, &content);
        }
        assert_eq!(writer.len(), 3);
        writer.flush(&paths).await.unwrap();

        let books: Vec<ManifestEntry> =
            serde_json::from_slice(&std::fs::read(&paths.books).unwrap()).unwrap();
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Science", "Honeycomb", "An Alien Hand"]);
    }

    #[tokio::test]
    async fn test_empty_writer_flushes_empty_records() {
        let dir = TempDir::new().unwrap();
        let paths = ManifestPaths::in_dir(dir.path());

        let writer = ManifestWriter::new();
        assert!(writer.is_empty());
        writer.flush(&paths).await.unwrap();

        let books: Vec<ManifestEntry> =
            serde_json::from_slice(&std::fs::read(&paths.books).unwrap()).unwrap();
        assert!(books.is_empty());
        let hashes: BTreeMap<String, String> =
            serde_json::from_slice(&std::fs::read(&paths.hashes).unwrap()).unwrap();
        assert!(hashes.is_empty());
    }

    #[tokio::test]
    async fn test_flush_to_unwritable_path_is_persist_error() {
        let dir = TempDir::new().unwrap();
        // The books destination is a directory: the write must fail.
        let paths = ManifestPaths {
            books: dir.path().to_path_buf(),
            hashes: dir.path().join(HASH_INDEX_FILENAME),
        };

        let mut writer = ManifestWriter::new();
        let (entry, reference, content) = sample("English", "Honeycomb", "abc123");
        writer.record(&entry, &reference, &content);

        let result = writer.flush(&paths).await;
        assert!(matches!(result, Err(PersistError::Io { .. })));
        // The failed flush must not have produced the second record either.
        assert!(!paths.hashes.exists());
    }
}
