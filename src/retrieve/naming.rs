//! Deterministic identifiers and output paths for retrieved content.
//!
//! Names are pure functions of the catalog entry so the same logical book
//! always maps to the same identifier and storage path across runs.

use std::path::{Path, PathBuf};

use crate::catalog::{CatalogEntry, ClassLevel};

/// Extension of the recognized content files inside retrieved archives.
pub(crate) const CONTENT_EXTENSION: &str = ".pdf";

/// Reduces a display name to a filesystem-safe component.
///
/// Every character outside `[A-Za-z0-9_.-]` becomes `_`, then the result
/// is lowercased. The mapping is idempotent.
#[must_use]
pub fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-') {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Stable identifier for one logical book: `c{class}_{subject}_{title}`
/// with sanitized components.
#[must_use]
pub fn book_id(entry: &CatalogEntry) -> String {
    format!(
        "c{}_{}_{}",
        entry.class.ordinal(),
        sanitize_component(&entry.subject),
        sanitize_component(&entry.title)
    )
}

/// Output filename for an entry's extracted content.
#[must_use]
pub fn content_filename(entry: &CatalogEntry) -> String {
    format!(
        "{}_{}{CONTENT_EXTENSION}",
        sanitize_component(&entry.subject),
        sanitize_component(&entry.title)
    )
}

/// Per-class output directory under the configured root.
#[must_use]
pub fn class_dir(output_root: &Path, class: ClassLevel) -> PathBuf {
    output_root.join(format!("class_{}", class.ordinal()))
}
