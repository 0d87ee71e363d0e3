//! Headless Chromium implementation of [`CatalogSession`] via chromiumoxide.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tracing::{debug, warn};

use super::session::{CatalogSession, SessionError};

/// Bound on a single page navigation.
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. HARVESTER_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("HARVESTER_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. System PATH
    if let Ok(path) = which::which("google-chrome") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium-browser") {
        return Some(path);
    }

    // 3. Common macOS location
    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// A live catalog session backed by one headless Chromium page.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    entry_url: String,
}

impl std::fmt::Debug for ChromiumSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromiumSession")
            .field("entry_url", &self.entry_url)
            .finish_non_exhaustive()
    }
}

impl ChromiumSession {
    /// Launches headless Chromium and opens one page for the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when no Chromium binary is available or the
    /// browser fails to launch.
    pub async fn launch(entry_url: impl Into<String>) -> Result<Self, SessionError> {
        let chrome_path = find_chromium().ok_or_else(|| {
            SessionError::driver(
                "launch",
                "Chromium not found; install google-chrome or set HARVESTER_CHROMIUM_PATH",
            )
        })?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(|message| SessionError::driver("launch", message))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| SessionError::driver("launch", e.to_string()))?;

        // Drain CDP events for the browser's lifetime.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| SessionError::driver("launch", e.to_string()))?;

        Ok(Self {
            browser,
            page,
            entry_url: entry_url.into(),
        })
    }

    /// Runs a script in the page and deserializes its completion value.
    async fn evaluate<T>(&self, action: &'static str, script: String) -> Result<T, SessionError>
    where
        T: serde::de::DeserializeOwned,
    {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| SessionError::driver(action, e.to_string()))?;
        result
            .into_value()
            .map_err(|e| SessionError::driver(action, format!("{e:?}")))
    }
}

#[async_trait]
impl CatalogSession for ChromiumSession {
    async fn open_entry_page(&mut self) -> Result<(), SessionError> {
        debug!(url = %self.entry_url, "opening catalog entry page");
        let navigation =
            tokio::time::timeout(NAVIGATION_TIMEOUT, self.page.goto(self.entry_url.as_str())).await;
        match navigation {
            Ok(Ok(_)) => {
                let _ = self.page.wait_for_navigation().await;
                Ok(())
            }
            Ok(Err(e)) => Err(SessionError::driver("open_entry_page", e.to_string())),
            Err(_) => Err(SessionError::driver(
                "open_entry_page",
                format!("navigation timed out after {}s", NAVIGATION_TIMEOUT.as_secs()),
            )),
        }
    }

    async fn option_labels(&mut self, control: &str) -> Result<Vec<String>, SessionError> {
        let script = format!(
            r#"(() => {{
                const select = document.querySelector("select[name='{}']");
                if (!select) {{ return []; }}
                return Array.from(select.options)
                    .filter((option) => option.value && option.value.trim() !== '')
                    .map((option) => option.textContent.trim());
            }})()"#,
            sanitize_js_string(control)
        );
        self.evaluate("option_labels", script).await
    }

    async fn select_option(&mut self, control: &str, label: &str) -> Result<(), SessionError> {
        let script = format!(
            r#"(() => {{
                const select = document.querySelector("select[name='{}']");
                if (!select) {{ return false; }}
                const target = Array.from(select.options)
                    .find((option) => option.textContent.trim() === '{}');
                if (!target) {{ return false; }}
                select.value = target.value;
                select.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            sanitize_js_string(control),
            sanitize_js_string(label)
        );
        let selected: bool = self.evaluate("select_option", script).await?;
        if !selected {
            return Err(SessionError::option_not_found(control, label));
        }
        Ok(())
    }

    async fn submit(&mut self) -> Result<(), SessionError> {
        let script = r#"(() => {
            const button = document.querySelector("[name='button']");
            if (!button) { return false; }
            button.click();
            return true;
        })()"#
            .to_string();
        let clicked: bool = self.evaluate("submit", script).await?;
        if !clicked {
            return Err(SessionError::driver("submit", "submit control not found"));
        }
        // The click triggers a navigation to the detail view; callers poll
        // page content for readiness, so a failed wait is not fatal here.
        let _ = self.page.wait_for_navigation().await;
        Ok(())
    }

    async fn page_html(&mut self) -> Result<String, SessionError> {
        self.evaluate(
            "page_html",
            "document.documentElement.outerHTML".to_string(),
        )
        .await
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "browser close failed; process reaped on drop");
            return Err(SessionError::driver("close", e.to_string()));
        }
        let _ = self.browser.wait().await;
        Ok(())
    }
}

/// Escapes a value for injection into a single-quoted JS string literal.
fn sanitize_js_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '"' => result.push_str("\\\""),
            '`' => result.push_str("\\`"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\0' => {}
            '<' => result.push_str("\\x3c"),
            '>' => result.push_str("\\x3e"),
            _ => result.push(ch),
        }
    }
    result
}
