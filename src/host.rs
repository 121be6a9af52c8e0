//! Capabilities the capture monitor needs from the browser
//!
//! `ChromeHost` implements these over chrome.* APIs; tests use an in-memory
//! host. Everything runs on the single wasm thread, so nothing here is `Send`.
#![allow(async_fn_in_trait)]

use crate::error::CaptureError;
use crate::link_data::{Settings, TabSnapshot};
use crate::storage::LinkLog;

/// Whole-value access to the two storage scopes
pub trait LinkStore {
    /// Settings from the sync scope; absent keys take their defaults
    async fn load_settings(&self) -> Result<Settings, CaptureError>;

    async fn store_settings(&self, settings: &Settings) -> Result<(), CaptureError>;

    /// Link collection from the local scope; absent means empty
    async fn load_links(&self) -> Result<LinkLog, CaptureError>;

    async fn store_links(&self, links: &LinkLog) -> Result<(), CaptureError>;
}

pub trait TabLookup {
    async fn get_tab(&self, tab_id: i32) -> Result<TabSnapshot, CaptureError>;
}

/// Toolbar icon badge
pub trait Badge {
    fn set_badge(&self, text: &str, color: &str);
}

pub trait Clock {
    /// Milliseconds since the Unix epoch
    fn now_ms(&self) -> f64;
}

/// Tab lifecycle notifications the monitor reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum TabEvent {
    /// A tab finished loading
    NavigationComplete {
        tab_id: i32,
        url: String,
        title: String,
    },
    /// The user switched to a tab; its details must be looked up
    TabActivated { tab_id: i32 },
}

impl TabEvent {
    /// Event for a chrome.tabs.onUpdated callback, if the change finished a load
    pub fn from_update(
        tab_id: i32,
        change_status: Option<&str>,
        tab: &TabSnapshot,
    ) -> Option<TabEvent> {
        if change_status != Some("complete") {
            return None;
        }

        tab.url().map(|url| TabEvent::NavigationComplete {
            tab_id,
            url: url.to_string(),
            title: tab.title().to_string(),
        })
    }
}
