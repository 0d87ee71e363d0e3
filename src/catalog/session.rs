//! Session abstraction over the live catalog interface.
//!
//! The navigator drives the catalog through this trait so the browser
//! engine stays swappable (headless Chromium in production, scripted
//! sessions in tests). The session is single-owned: the interface mutates
//! in place on every selection, so it is never shared across tasks.

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a catalog session implementation.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The underlying browser driver failed.
    #[error("browser driver failed during {action}: {message}")]
    Driver {
        /// What the session was doing when the driver failed.
        action: &'static str,
        /// Driver-reported failure detail.
        message: String,
    },

    /// A selection control has no option with the requested label.
    #[error("control '{control}' has no option labeled '{label}'")]
    OptionNotFound {
        /// The selection control name.
        control: String,
        /// The visible option label that was requested.
        label: String,
    },
}

impl SessionError {
    /// Creates a driver error with context about the failing action.
    pub fn driver(action: &'static str, message: impl Into<String>) -> Self {
        Self::Driver {
            action,
            message: message.into(),
        }
    }

    /// Creates an option-not-found error.
    pub fn option_not_found(control: impl Into<String>, label: impl Into<String>) -> Self {
        Self::OptionNotFound {
            control: control.into(),
            label: label.into(),
        }
    }
}

/// A live, stateful session against the catalog's selection interface.
///
/// Selections are only valid once the dependent predecessor has loaded its
/// options; callers (the navigator) poll [`option_labels`](Self::option_labels)
/// for readiness rather than assuming synchronous availability.
#[async_trait]
pub trait CatalogSession: Send {
    /// Navigates (or re-navigates) to the catalog entry page, resetting any
    /// transient selection state from a prior entry.
    async fn open_entry_page(&mut self) -> Result<(), SessionError>;

    /// Visible labels of the named control's currently offered options,
    /// excluding the initial "unselected" placeholder (options with an
    /// empty value).
    async fn option_labels(&mut self, control: &str) -> Result<Vec<String>, SessionError>;

    /// Selects the option with the given visible label in the named
    /// control, firing the interface's change handling.
    async fn select_option(&mut self, control: &str, label: &str) -> Result<(), SessionError>;

    /// Triggers the submit action, navigating to the detail view for the
    /// current selection.
    async fn submit(&mut self) -> Result<(), SessionError>;

    /// Full HTML of the current page.
    async fn page_html(&mut self) -> Result<String, SessionError>;

    /// Releases the session. Called unconditionally at run end.
    async fn close(&mut self) -> Result<(), SessionError>;
}
