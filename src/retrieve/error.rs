//! Error types for the retrieval pipeline.
//!
//! Every variant is a per-entry outcome: the entry is skipped and the run
//! continues. Context (URL or path) rides along for log lines and user
//! feedback.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while processing one entry's archive.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Transport-level failure fetching the archive (DNS, connect,
    /// timeout, mid-stream disconnect).
    #[error("network error fetching {url}: {source}")]
    Fetch {
        /// The archive URL that failed.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The archive host answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    FetchStatus {
        /// The archive URL that failed.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The fetched bytes are not a readable archive container.
    #[error("unreadable archive from {url}: {source}")]
    Archive {
        /// The archive URL whose payload was corrupt.
        url: String,
        /// The underlying container error.
        #[source]
        source: zip::result::ZipError,
    },

    /// The archive is valid but holds no recognized content file.
    #[error("no content file in archive from {url}")]
    NoContent {
        /// The archive URL with no usable content.
        url: String,
    },

    /// File system error while staging or writing content.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl ProcessError {
    /// Creates a transport error.
    pub fn fetch(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Fetch {
            url: url.into(),
            source,
        }
    }

    /// Creates a non-success status error.
    pub fn fetch_status(url: impl Into<String>, status: u16) -> Self {
        Self::FetchStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an unreadable-archive error.
    pub fn archive(url: impl Into<String>, source: zip::result::ZipError) -> Self {
        Self::Archive {
            url: url.into(),
            source,
        }
    }

    /// Creates a no-recognized-content error.
    pub fn no_content(url: impl Into<String>) -> Self {
        Self::NoContent { url: url.into() }
    }

    /// Creates an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
