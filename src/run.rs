//! Sequential harvest orchestration.
//!
//! Entries are processed strictly one at a time: the browser session is
//! mutated in place by every selection and is not safe for concurrent
//! navigation, and interleaving resolution with retrieval keeps the
//! per-entry reference fresh. Per-entry failures are logged and skipped;
//! only discovery and the final manifest flush abort the run.

use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::{CatalogNavigator, CatalogSession, ClassLevel, DiscoveryError};
use crate::manifest::{ManifestPaths, ManifestWriter, PersistError};
use crate::retrieve::RetrievalPipeline;

/// Run-fatal harvest failures. Everything else skips a single entry.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The catalog never yielded the class's entries.
    #[error("discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// The manifest could not be persisted; the run is incomplete even
    /// though processing succeeded.
    #[error("manifest flush failed: {0}")]
    Persist(#[from] PersistError),
}

/// Counters summarizing one harvest run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HarvestStats {
    /// Entries enumerated during discovery.
    pub discovered: usize,
    /// Entries retrieved, extracted, and recorded.
    pub retrieved: usize,
    /// Entries skipped after a per-entry failure.
    pub skipped: usize,
}

/// Harvests every book the catalog offers under `class`.
///
/// Discovery enumerates the entries, then each entry is resolved and
/// processed in turn. The writer accumulates successes and flushes both
/// manifest records exactly once after the loop; nothing is persisted if
/// the run aborts earlier.
///
/// # Errors
///
/// Returns [`HarvestError::Discovery`] when enumeration fails and
/// [`HarvestError::Persist`] when the final flush fails. Per-entry
/// resolution and processing errors are logged and counted as skips.
pub async fn run_harvest<S: CatalogSession>(
    navigator: &mut CatalogNavigator<S>,
    pipeline: &RetrievalPipeline,
    mut writer: ManifestWriter,
    class: ClassLevel,
    manifest_paths: &ManifestPaths,
) -> Result<HarvestStats, HarvestError> {
    info!(class = %class, "gathering book information");
    let entries = navigator.discover(class).await?;
    info!(books = entries.len(), "discovery complete");

    let mut stats = HarvestStats {
        discovered: entries.len(),
        ..HarvestStats::default()
    };

    for entry in &entries {
        info!(entry = %entry, "processing");

        let reference = match navigator.resolve_archive_reference(entry).await {
            Ok(reference) => reference,
            Err(error) => {
                warn!(entry = %entry, error = %error, "skipping entry: resolution failed");
                stats.skipped += 1;
                continue;
            }
        };

        match pipeline.process(entry, &reference).await {
            Ok(content) => {
                writer.record(entry, &reference, &content);
                stats.retrieved += 1;
            }
            Err(error) => {
                warn!(entry = %entry, error = %error, "skipping entry: retrieval failed");
                stats.skipped += 1;
            }
        }
    }

    writer.flush(manifest_paths).await?;
    Ok(stats)
}
