/// Data structures for Link Locker
use serde::{Deserialize, Serialize};

use crate::domain::extract_hostname;
use crate::error::CaptureError;

/// Cap on stored links when settings don't say otherwise
pub const DEFAULT_MAX_LINKS: usize = 200;

/// Title stored for pages that report none
pub const DEFAULT_TITLE: &str = "Untitled";

/// One captured navigation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkEntry {
    pub id: f64,
    pub url: String,
    pub title: String,
    pub domain: String,
    pub timestamp: f64,
    pub tab_id: i32,
}

impl LinkEntry {
    /// Build an entry captured at `now` (ms since epoch).
    ///
    /// The id is the capture time plus a random fraction, so two captures in
    /// the same millisecond still get distinct ids. Fails when the URL doesn't
    /// parse as an absolute URL.
    pub fn capture(
        url: &str,
        title: &str,
        tab_id: i32,
        now: f64,
    ) -> Result<LinkEntry, CaptureError> {
        let domain = extract_hostname(url)?;
        let title = if title.trim().is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title.to_string()
        };

        Ok(LinkEntry {
            id: now + random_fraction(),
            url: url.to_string(),
            title,
            domain,
            timestamp: now,
            tab_id,
        })
    }
}

/// Random value in [0, 1), or 0 when the platform has no entropy source
fn random_fraction() -> f64 {
    let mut buf = [0u8; 4];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u32::from_le_bytes(buf) as f64 / (u32::MAX as f64 + 1.0),
        Err(e) => {
            log::warn!("No randomness for link id, using bare timestamp: {}", e);
            0.0
        }
    }
}

/// Process-wide settings kept in sync storage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_logging_enabled")]
    pub is_logging_enabled: bool,
    #[serde(default = "default_max_links")]
    pub max_links: usize,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_max_links() -> usize {
    DEFAULT_MAX_LINKS
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            is_logging_enabled: default_logging_enabled(),
            max_links: default_max_links(),
        }
    }
}

/// What the host reports about a tab when looked up by id
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TabSnapshot {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl TabSnapshot {
    pub fn is_complete(&self) -> bool {
        self.status.as_deref() == Some("complete")
    }

    /// Non-empty URL, if the tab has one
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}
