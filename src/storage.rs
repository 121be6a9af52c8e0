/// The stored link collection and its retention rules

use crate::link_data::LinkEntry;
use serde::{Deserialize, Serialize};

/// Repeat captures of a URL inside this window are dropped
pub const DEDUP_WINDOW_MS: f64 = 30_000.0;

/// Counts above this show the overflow marker on the badge
pub const BADGE_OVERFLOW_AT: usize = 99;

pub const BADGE_OVERFLOW_TEXT: &str = "MAX";

pub const BADGE_COLOR: &str = "#00ffff";

/// Links as stored in chrome.storage.local, most recent first
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct LinkLog {
    pub links: Vec<LinkEntry>,
}

impl LinkLog {
    pub fn new() -> Self {
        LinkLog { links: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Whether `url` was captured less than the dedup window before `now`
    pub fn has_recent(&self, url: &str, now: f64) -> bool {
        let cutoff = now - DEDUP_WINDOW_MS;
        self.links
            .iter()
            .any(|link| link.url == url && link.timestamp > cutoff)
    }

    /// Insert at the head, then drop the oldest entries beyond `max_links`
    pub fn push_front(&mut self, entry: LinkEntry, max_links: usize) {
        self.links.insert(0, entry);
        self.links.truncate(max_links);
    }

    pub fn clear(&mut self) {
        self.links.clear();
    }

    /// Badge text for the current count
    pub fn badge_text(&self) -> String {
        badge_text(self.len())
    }
}

pub fn badge_text(count: usize) -> String {
    match count {
        0 => String::new(),
        n if n > BADGE_OVERFLOW_AT => BADGE_OVERFLOW_TEXT.to_string(),
        n => n.to_string(),
    }
}
