//! Dependent-option catalog traversal.
//!
//! The interface is a three-level dependent state machine: selecting a
//! class populates the subject list, selecting a subject populates the
//! title list, and submitting navigates to the detail view. Every
//! transition waits for the next level to become populated through a
//! fixed-count poll with a bounded interval, never an unbounded spin.

use std::time::Duration;

use tracing::{debug, info, instrument};
use url::Url;

use super::detail::{archive_anchor_href, normalize_reference};
use super::error::{DiscoveryError, ResolutionError};
use super::session::{CatalogSession, SessionError};
use super::{ArchiveReference, CatalogEntry, ClassLevel};

/// Name of the class selection control.
const CLASS_CONTROL: &str = "tclass";

/// Name of the subject selection control (dependent on class).
const SUBJECT_CONTROL: &str = "tsubject";

/// Name of the title selection control (dependent on subject).
const TITLE_CONTROL: &str = "tbook";

/// Readiness polling bounds for dependent option lists and the detail view.
///
/// The defaults bound each wait at roughly ten seconds (20 x 500ms),
/// matching the interface's observed worst-case option load time.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Maximum number of readiness checks per wait.
    pub attempts: u32,
    /// Delay between consecutive checks.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            attempts: 20,
            interval: Duration::from_millis(500),
        }
    }
}

impl PollConfig {
    /// Derives a config from a total timeout, keeping the default interval.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let interval = Duration::from_millis(500);
        let attempts = (timeout.as_millis() / interval.as_millis()).max(1);
        Self {
            attempts: u32::try_from(attempts).unwrap_or(u32::MAX),
            interval,
        }
    }
}

/// Drives a stateful session against the catalog's selection interface.
///
/// The navigator exclusively owns the session for the run's lifetime; the
/// interface mutates in place on every selection and is not safe to share.
#[derive(Debug)]
pub struct CatalogNavigator<S> {
    session: S,
    entry_url: Url,
    poll: PollConfig,
}

impl<S: CatalogSession> CatalogNavigator<S> {
    /// Creates a navigator over an open session.
    ///
    /// `entry_url` is the catalog's fixed entry point; archive references
    /// found on detail views are normalized against it.
    pub fn new(session: S, entry_url: Url, poll: PollConfig) -> Self {
        Self {
            session,
            entry_url,
            poll,
        }
    }

    /// Enumerates every (subject, title) pair the catalog currently offers
    /// under the given class.
    ///
    /// The subject and title lists are dependent options and cannot be
    /// precomputed; each is observed live after the selection that
    /// populates it.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] when the class selection never yields a
    /// subject list, a subject never yields titles, or the session fails.
    /// Discovery failure is fatal to the run.
    #[instrument(skip(self), fields(class = %class))]
    pub async fn discover(&mut self, class: ClassLevel) -> Result<Vec<CatalogEntry>, DiscoveryError> {
        self.session.open_entry_page().await?;
        self.session
            .select_option(CLASS_CONTROL, class.label())
            .await?;

        let subjects = self
            .await_options(SUBJECT_CONTROL)
            .await?
            .ok_or_else(|| DiscoveryError::subjects_unavailable(class.label()))?;
        debug!(subjects = subjects.len(), "subject list loaded");

        let mut entries = Vec::new();
        for subject in subjects {
            self.session
                .select_option(SUBJECT_CONTROL, &subject)
                .await?;
            let titles = self
                .await_options(TITLE_CONTROL)
                .await?
                .ok_or_else(|| DiscoveryError::titles_unavailable(&subject))?;
            debug!(subject = %subject, titles = titles.len(), "title list loaded");
            for title in titles {
                entries.push(CatalogEntry::new(class, subject.clone(), title));
            }
        }

        info!(entries = entries.len(), "discovery complete");
        Ok(entries)
    }

    /// Re-navigates to the entry's detail view and extracts its archive
    /// reference.
    ///
    /// Each resolution starts over from the entry page: per-entry
    /// navigation leaves transient interface state that cannot be assumed
    /// valid on the next entry.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when a dependent option list never
    /// loads, the detail view never exposes the download anchor, or the
    /// session fails. Resolution failures skip the entry; callers must not
    /// abort the run.
    #[instrument(skip(self, entry), fields(title = %entry.title))]
    pub async fn resolve_archive_reference(
        &mut self,
        entry: &CatalogEntry,
    ) -> Result<ArchiveReference, ResolutionError> {
        self.session.open_entry_page().await?;
        self.session
            .select_option(CLASS_CONTROL, entry.class.label())
            .await?;

        if self.await_options(SUBJECT_CONTROL).await?.is_none() {
            return Err(ResolutionError::options_timeout(
                SUBJECT_CONTROL,
                &entry.title,
            ));
        }
        self.session
            .select_option(SUBJECT_CONTROL, &entry.subject)
            .await?;

        if self.await_options(TITLE_CONTROL).await?.is_none() {
            return Err(ResolutionError::options_timeout(TITLE_CONTROL, &entry.title));
        }
        self.session
            .select_option(TITLE_CONTROL, &entry.title)
            .await?;

        self.session.submit().await?;

        let href = self
            .await_archive_anchor()
            .await?
            .ok_or_else(|| ResolutionError::missing_archive_link(&entry.title))?;
        debug!(href = %href, "archive anchor found");

        normalize_reference(&self.entry_url, &href)
            .ok_or_else(|| ResolutionError::invalid_reference(href, &entry.title))
    }

    /// Releases the underlying session. Called unconditionally at run end.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if teardown fails; callers typically log
    /// and continue.
    pub async fn close(mut self) -> Result<(), SessionError> {
        self.session.close().await
    }

    /// Polls a selection control until it offers at least one real option.
    ///
    /// Returns `Ok(None)` when the bounded poll is exhausted.
    async fn await_options(&mut self, control: &str) -> Result<Option<Vec<String>>, SessionError> {
        for attempt in 0..self.poll.attempts {
            let labels = self.session.option_labels(control).await?;
            if !labels.is_empty() {
                return Ok(Some(labels));
            }
            if attempt + 1 < self.poll.attempts {
                tokio::time::sleep(self.poll.interval).await;
            }
        }
        Ok(None)
    }

    /// Polls the current page until the archive anchor appears.
    async fn await_archive_anchor(&mut self) -> Result<Option<String>, SessionError> {
        for attempt in 0..self.poll.attempts {
            let html = self.session.page_html().await?;
            if let Some(href) = archive_anchor_href(&html) {
                return Ok(Some(href));
            }
            if attempt + 1 < self.poll.attempts {
                tokio::time::sleep(self.poll.interval).await;
            }
        }
        Ok(None)
    }
}
