//! Error types for catalog discovery and per-entry resolution.
//!
//! The two enums carry different fatality contracts: a [`DiscoveryError`]
//! aborts the run (nothing can be enumerated), while a [`ResolutionError`]
//! only skips the entry it occurred on.

use thiserror::Error;

use super::session::SessionError;

/// Errors during class-level discovery. Fatal to the run.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Selecting the class never populated the subject list.
    #[error("catalog never offered subjects for {class_label}")]
    SubjectsUnavailable {
        /// The class label that was selected.
        class_label: String,
    },

    /// Selecting a subject never populated the title list.
    #[error("catalog never offered titles for subject '{subject}'")]
    TitlesUnavailable {
        /// The subject whose titles never loaded.
        subject: String,
    },

    /// The session failed while enumerating.
    #[error("session failed during discovery: {0}")]
    Session(#[from] SessionError),
}

impl DiscoveryError {
    /// Creates a subjects-never-loaded error.
    pub fn subjects_unavailable(class_label: impl Into<String>) -> Self {
        Self::SubjectsUnavailable {
            class_label: class_label.into(),
        }
    }

    /// Creates a titles-never-loaded error.
    pub fn titles_unavailable(subject: impl Into<String>) -> Self {
        Self::TitlesUnavailable {
            subject: subject.into(),
        }
    }
}

/// Errors resolving a single entry's archive reference. The entry is
/// skipped; the run continues.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// A dependent option list never became ready while re-selecting.
    #[error("options for '{control}' never loaded while resolving '{title}'")]
    OptionsTimeout {
        /// The selection control that never populated.
        control: String,
        /// The title being resolved.
        title: String,
    },

    /// The detail view never exposed the expected download anchor.
    #[error("no archive link on the detail view for '{title}'")]
    MissingArchiveLink {
        /// The title whose detail view lacked the anchor.
        title: String,
    },

    /// The anchor's reference could not be normalized to an absolute URL.
    #[error("archive reference '{href}' for '{title}' is not a valid URL")]
    InvalidReference {
        /// The raw href from the detail view.
        href: String,
        /// The title being resolved.
        title: String,
    },

    /// The session failed while resolving.
    #[error("session failed during resolution: {0}")]
    Session(#[from] SessionError),
}

impl ResolutionError {
    /// Creates an options-timeout error.
    pub fn options_timeout(control: impl Into<String>, title: impl Into<String>) -> Self {
        Self::OptionsTimeout {
            control: control.into(),
            title: title.into(),
        }
    }

    /// Creates a missing-anchor error.
    pub fn missing_archive_link(title: impl Into<String>) -> Self {
        Self::MissingArchiveLink {
            title: title.into(),
        }
    }

    /// Creates an invalid-reference error.
    pub fn invalid_reference(href: impl Into<String>, title: impl Into<String>) -> Self {
        Self::InvalidReference {
            href: href.into(),
            title: title.into(),
        }
    }
}
