//! Catalog discovery and navigation.
//!
//! The catalog is a three-level dependent selection interface: picking a
//! class populates the subject list, picking a subject populates the title
//! list, and submitting the full selection navigates to a detail view that
//! links to the book's packaged archive.
//!
//! # Architecture
//!
//! - [`CatalogSession`] - Async trait over the live browser session
//! - [`ChromiumSession`] - Headless Chromium implementation (CDP)
//! - [`CatalogNavigator`] - Drives discovery and per-entry reference resolution
//! - [`ClassLevel`] - Closed enumeration of the twelve known classes
//!
//! # Example
//!
//! ```no_run
//! use harvester_core::catalog::{CatalogNavigator, ChromiumSession, ClassLevel, PollConfig};
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let entry_url = Url::parse("https://catalog.example/books")?;
//! let session = ChromiumSession::launch(entry_url.as_str()).await?;
//! let mut navigator = CatalogNavigator::new(session, entry_url, PollConfig::default());
//! let entries = navigator.discover(ClassLevel::Seven).await?;
//! println!("found {} books", entries.len());
//! # Ok(())
//! # }
//! ```

mod chromium;
mod detail;
mod error;
mod navigator;
mod session;

pub use chromium::ChromiumSession;
pub use detail::{archive_anchor_href, normalize_reference};
pub use error::{DiscoveryError, ResolutionError};
pub use navigator::{CatalogNavigator, PollConfig};
pub use session::{CatalogSession, SessionError};

use std::fmt;
use std::str::FromStr;

/// The catalog's fixed entry page.
pub const DEFAULT_ENTRY_URL: &str = "https://ncert.nic.in/textbook.php?ln=en";

/// The twelve classes the catalog publishes books under.
///
/// The interface labels classes with Roman numerals; these labels are part
/// of the catalog's stable contract, unlike subject and title lists which
/// are dependent options observed live per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassLevel {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Eleven,
    Twelve,
}

impl ClassLevel {
    /// All classes in ascending order.
    pub const ALL: [ClassLevel; 12] = [
        ClassLevel::One,
        ClassLevel::Two,
        ClassLevel::Three,
        ClassLevel::Four,
        ClassLevel::Five,
        ClassLevel::Six,
        ClassLevel::Seven,
        ClassLevel::Eight,
        ClassLevel::Nine,
        ClassLevel::Ten,
        ClassLevel::Eleven,
        ClassLevel::Twelve,
    ];

    /// The class number (1-12).
    #[must_use]
    pub fn ordinal(self) -> u8 {
        match self {
            ClassLevel::One => 1,
            ClassLevel::Two => 2,
            ClassLevel::Three => 3,
            ClassLevel::Four => 4,
            ClassLevel::Five => 5,
            ClassLevel::Six => 6,
            ClassLevel::Seven => 7,
            ClassLevel::Eight => 8,
            ClassLevel::Nine => 9,
            ClassLevel::Ten => 10,
            ClassLevel::Eleven => 11,
            ClassLevel::Twelve => 12,
        }
    }

    /// The visible option label the interface uses for this class.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ClassLevel::One => "Class I",
            ClassLevel::Two => "Class II",
            ClassLevel::Three => "Class III",
            ClassLevel::Four => "Class IV",
            ClassLevel::Five => "Class V",
            ClassLevel::Six => "Class VI",
            ClassLevel::Seven => "Class VII",
            ClassLevel::Eight => "Class VIII",
            ClassLevel::Nine => "Class IX",
            ClassLevel::Ten => "Class X",
            ClassLevel::Eleven => "Class XI",
            ClassLevel::Twelve => "Class XII",
        }
    }

    /// CLI value parser: accepts the class number ("1" through "12").
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for anything outside the closed
    /// enumeration.
    pub fn parse_cli(value: &str) -> Result<Self, String> {
        value.parse()
    }
}

impl fmt::Display for ClassLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ClassLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ordinal: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid class '{s}': expected a number from 1 to 12"))?;
        ClassLevel::ALL
            .iter()
            .copied()
            .find(|class| class.ordinal() == ordinal)
            .ok_or_else(|| format!("invalid class '{s}': expected a number from 1 to 12"))
    }
}

/// One logical book: a (class, subject, title) triple.
///
/// Subject and title are the display names observed live in the interface;
/// the triple is unique within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// The class the book is published under.
    pub class: ClassLevel,
    /// Subject display name from the interface.
    pub subject: String,
    /// Title display name from the interface.
    pub title: String,
}

impl CatalogEntry {
    /// Creates an entry from interface display names.
    #[must_use]
    pub fn new(class: ClassLevel, subject: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            class,
            subject: subject.into(),
            title: title.into(),
        }
    }
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.class, self.subject, self.title)
    }
}

/// The resolved absolute retrieval locator for one entry's archive.
///
/// Derived fresh per entry immediately before retrieval; the interface is
/// navigation-stateful, so references are never cached across entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReference {
    url: String,
}

impl ArchiveReference {
    /// Wraps an already-absolute archive URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// The absolute URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for ArchiveReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
