/// Popup-side operations: search filtering, view state, age labels

use crate::link_data::LinkEntry;

const MINUTE_MS: f64 = 60_000.0;
const HOUR_MS: f64 = 3_600_000.0;
const DAY_MS: f64 = 86_400_000.0;

/// Entries whose title, URL or domain contain `query`, ignoring case.
/// A blank query returns every entry in stored order.
pub fn filter_links(links: &[LinkEntry], query: &str) -> Vec<LinkEntry> {
    if query.trim().is_empty() {
        return links.to_vec();
    }

    let query = query.to_lowercase();
    links
        .iter()
        .filter(|link| {
            link.title.to_lowercase().contains(&query)
                || link.url.to_lowercase().contains(&query)
                || link.domain.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

/// Which of the three mutually exclusive list states the popup shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Empty,
    NoResults,
    List,
}

impl ViewState {
    pub fn of(total: usize, visible: usize) -> ViewState {
        if total == 0 {
            ViewState::Empty
        } else if visible == 0 {
            ViewState::NoResults
        } else {
            ViewState::List
        }
    }
}

/// How long ago a link was captured, bucketed for display
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgeLabel {
    JustNow,
    Minutes(u64),
    Hours(u64),
    Days(u64),
    /// Older than a week: shown as the capture date
    On(f64),
}

impl AgeLabel {
    pub fn between(timestamp: f64, now: f64) -> AgeLabel {
        let diff = (now - timestamp).max(0.0);
        let minutes = (diff / MINUTE_MS).floor() as u64;
        let hours = (diff / HOUR_MS).floor() as u64;
        let days = (diff / DAY_MS).floor() as u64;

        if minutes < 1 {
            AgeLabel::JustNow
        } else if minutes < 60 {
            AgeLabel::Minutes(minutes)
        } else if hours < 24 {
            AgeLabel::Hours(hours)
        } else if days < 7 {
            AgeLabel::Days(days)
        } else {
            AgeLabel::On(timestamp)
        }
    }

    /// Relative text like "5m ago"; `None` for `On`, which the popup renders
    /// as a local date
    pub fn relative(&self) -> Option<String> {
        match self {
            AgeLabel::JustNow => Some("just now".to_string()),
            AgeLabel::Minutes(n) => Some(format!("{}m ago", n)),
            AgeLabel::Hours(n) => Some(format!("{}h ago", n)),
            AgeLabel::Days(n) => Some(format!("{}d ago", n)),
            AgeLabel::On(_) => None,
        }
    }
}
