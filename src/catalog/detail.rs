//! Detail-view scan for the archive download anchor.
//!
//! The detail view links to the book's packaged archive through an anchor
//! whose visible text contains a known phrase. References come back
//! absolute or site-root-relative and are normalized against the catalog's
//! entry URL.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use super::ArchiveReference;

/// Visible anchor text identifying the whole-book archive link.
pub(crate) const ARCHIVE_LINK_TEXT: &str = "Download complete book";

#[allow(clippy::expect_used)]
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("static selector 'a' is valid"));

/// Extracts the href of the first anchor whose visible text contains the
/// download-archive phrase. Anchors without an `href` are ignored.
#[must_use]
pub fn archive_anchor_href(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document.select(&ANCHOR_SELECTOR).find_map(|anchor| {
        let text: String = anchor.text().collect();
        if !text.contains(ARCHIVE_LINK_TEXT) {
            return None;
        }
        anchor
            .value()
            .attr("href")
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty())
    })
}

/// Normalizes an anchor reference against the catalog's entry URL.
///
/// Absolute references pass through; site-root-relative and page-relative
/// references resolve against the entry URL's origin and path.
#[must_use]
pub fn normalize_reference(entry_url: &Url, href: &str) -> Option<ArchiveReference> {
    entry_url
        .join(href)
        .ok()
        .map(|resolved| ArchiveReference::new(String::from(resolved)))
}
