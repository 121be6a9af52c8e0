/// Background capture: turns tab events into stored links and answers popup commands

use crate::domain::is_excluded_url;
use crate::error::CaptureError;
use crate::host::{Badge, Clock, LinkStore, TabEvent, TabLookup};
use crate::link_data::{LinkEntry, Settings};
use crate::message::{Ack, Command};
use crate::storage::{LinkLog, BADGE_COLOR};

/// Why a capture did or didn't store anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    Recorded,
    LoggingDisabled,
    Excluded,
    /// Same URL already captured inside the dedup window
    Duplicate,
}

pub struct CaptureMonitor<H> {
    host: H,
}

impl<H> CaptureMonitor<H>
where
    H: LinkStore + TabLookup + Badge + Clock,
{
    pub fn new(host: H) -> Self {
        CaptureMonitor { host }
    }

    /// Seed default settings; runs from the host's install hook
    pub async fn install(&self) -> Result<(), CaptureError> {
        self.host.store_settings(&Settings::default()).await?;
        log::info!("Link Locker installed");
        Ok(())
    }

    /// Re-apply the badge from stored links; the host forgets it on restart
    pub async fn restore_badge(&self) -> Result<(), CaptureError> {
        let links = self.host.load_links().await?;
        self.host.set_badge(&links.badge_text(), BADGE_COLOR);
        Ok(())
    }

    /// Dispatch a tab event. Capture is best effort: failures are logged, never returned.
    pub async fn handle_event(&self, event: TabEvent) {
        let result = match event {
            TabEvent::NavigationComplete { tab_id, url, title } => {
                self.log_link(&url, &title, tab_id).await
            }
            TabEvent::TabActivated { tab_id } => match self.host.get_tab(tab_id).await {
                Ok(tab) => match tab.url() {
                    Some(url) if tab.is_complete() => self.log_link(url, tab.title(), tab_id).await,
                    _ => return,
                },
                Err(e) => {
                    log::warn!("Error getting active tab {}: {}", tab_id, e);
                    return;
                }
            },
        };

        match result {
            Ok(outcome) => log::debug!("Capture outcome: {:?}", outcome),
            Err(e) => log::error!("Error logging link: {}", e),
        }
    }

    /// Record a visit unless logging is off, the page is excluded, or the
    /// same URL was captured within the dedup window.
    ///
    /// Steps:
    /// 1. Check settings and excluded schemes
    /// 2. Load links and scan for a recent duplicate
    /// 3. Prepend the new entry and truncate to `max_links`
    /// 4. Write the whole collection back, then update the badge
    pub async fn log_link(
        &self,
        url: &str,
        title: &str,
        tab_id: i32,
    ) -> Result<CaptureOutcome, CaptureError> {
        let settings = self.host.load_settings().await?;
        if !settings.is_logging_enabled {
            return Ok(CaptureOutcome::LoggingDisabled);
        }

        if is_excluded_url(url) {
            return Ok(CaptureOutcome::Excluded);
        }

        let mut links = self.host.load_links().await?;
        let now = self.host.now_ms();

        if links.has_recent(url, now) {
            return Ok(CaptureOutcome::Duplicate);
        }

        let entry = LinkEntry::capture(url, title, tab_id, now)?;
        links.push_front(entry, settings.max_links);

        self.host.store_links(&links).await?;
        self.host.set_badge(&links.badge_text(), BADGE_COLOR);

        Ok(CaptureOutcome::Recorded)
    }

    /// Apply a popup command. Always acknowledges; storage failures are logged.
    pub async fn handle_command(&self, command: Command) -> Ack {
        let result = match command {
            Command::ClearLinks => self.clear_links().await,
            Command::ToggleLogging { enabled } => self.set_logging_enabled(enabled).await,
        };

        if let Err(e) = result {
            log::error!("Error handling command: {}", e);
        }

        Ack::ok()
    }

    async fn clear_links(&self) -> Result<(), CaptureError> {
        // clear the badge even if the write fails
        self.host.set_badge("", BADGE_COLOR);
        self.host.store_links(&LinkLog::new()).await
    }

    async fn set_logging_enabled(&self, enabled: bool) -> Result<(), CaptureError> {
        // an unreadable record must not be replaced, or max_links is lost
        let mut settings = self.host.load_settings().await?;
        settings.is_logging_enabled = enabled;
        self.host.store_settings(&settings).await?;
        log::info!("Logging {}", if enabled { "enabled" } else { "disabled" });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link_data::TabSnapshot;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    const START: f64 = 1_700_000_000_000.0;

    #[derive(Default)]
    struct MemoryHost {
        settings: RefCell<Option<Settings>>,
        links: RefCell<Option<LinkLog>>,
        tabs: RefCell<HashMap<i32, TabSnapshot>>,
        badge: RefCell<(String, String)>,
        now: Cell<f64>,
        fail_reads: Cell<bool>,
        fail_writes: Cell<bool>,
        /// Suspend once inside load_links so two captures can interleave
        yield_on_load: Cell<bool>,
    }

    /// Returns Pending exactly once, waking itself so the executor polls again
    #[derive(Default)]
    struct YieldOnce {
        yielded: bool,
    }

    impl Future for YieldOnce {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.yielded {
                Poll::Ready(())
            } else {
                self.yielded = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    impl MemoryHost {
        fn new() -> Self {
            let host = MemoryHost::default();
            host.now.set(START);
            host
        }

        fn advance(&self, ms: f64) {
            self.now.set(self.now.get() + ms);
        }

        fn stored(&self) -> Vec<LinkEntry> {
            self.links.borrow().clone().unwrap_or_default().links
        }

        fn fail_storage(&self) {
            self.fail_reads.set(true);
            self.fail_writes.set(true);
        }

        fn check_read(&self) -> Result<(), CaptureError> {
            if self.fail_reads.get() {
                Err(CaptureError::Storage("storage unavailable".to_string()))
            } else {
                Ok(())
            }
        }

        fn check_write(&self) -> Result<(), CaptureError> {
            if self.fail_writes.get() {
                Err(CaptureError::Storage("storage unavailable".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl LinkStore for MemoryHost {
        async fn load_settings(&self) -> Result<Settings, CaptureError> {
            self.check_read()?;
            Ok(self.settings.borrow().clone().unwrap_or_default())
        }

        async fn store_settings(&self, settings: &Settings) -> Result<(), CaptureError> {
            self.check_write()?;
            *self.settings.borrow_mut() = Some(settings.clone());
            Ok(())
        }

        async fn load_links(&self) -> Result<LinkLog, CaptureError> {
            self.check_read()?;
            let links = self.links.borrow().clone().unwrap_or_default();
            if self.yield_on_load.get() {
                YieldOnce::default().await;
            }
            Ok(links)
        }

        async fn store_links(&self, links: &LinkLog) -> Result<(), CaptureError> {
            self.check_write()?;
            *self.links.borrow_mut() = Some(links.clone());
            Ok(())
        }
    }

    impl TabLookup for MemoryHost {
        async fn get_tab(&self, tab_id: i32) -> Result<TabSnapshot, CaptureError> {
            self.tabs
                .borrow()
                .get(&tab_id)
                .cloned()
                .ok_or_else(|| CaptureError::Host(format!("No tab with id: {}", tab_id)))
        }
    }

    impl Badge for MemoryHost {
        fn set_badge(&self, text: &str, color: &str) {
            *self.badge.borrow_mut() = (text.to_string(), color.to_string());
        }
    }

    impl Clock for MemoryHost {
        fn now_ms(&self) -> f64 {
            self.now.get()
        }
    }

    fn monitor() -> CaptureMonitor<MemoryHost> {
        CaptureMonitor::new(MemoryHost::new())
    }

    fn complete_tab(url: &str, title: &str) -> TabSnapshot {
        TabSnapshot {
            url: Some(url.to_string()),
            title: Some(title.to_string()),
            status: Some("complete".to_string()),
        }
    }

    #[test]
    fn test_capture_records_entry_and_badge() {
        let m = monitor();

        let outcome = block_on(m.log_link("https://a.com/x", "Title A", 3)).unwrap();

        assert_eq!(outcome, CaptureOutcome::Recorded);
        let stored = m.host.stored();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].url, "https://a.com/x");
        assert_eq!(stored[0].title, "Title A");
        assert_eq!(stored[0].domain, "a.com");
        assert_eq!(stored[0].timestamp, START);
        assert_eq!(stored[0].tab_id, 3);
        assert_eq!(*m.host.badge.borrow(), ("1".to_string(), "#00ffff".to_string()));
    }

    #[test]
    fn test_immediate_repeat_is_suppressed() {
        let m = monitor();

        block_on(m.log_link("https://a.com/x", "Title A", 1)).unwrap();
        m.host.advance(500.0);
        let outcome = block_on(m.log_link("https://a.com/x", "Title A", 1)).unwrap();

        assert_eq!(outcome, CaptureOutcome::Duplicate);
        assert_eq!(m.host.stored().len(), 1);
    }

    #[test]
    fn test_repeat_after_window_is_recorded() {
        let m = monitor();

        block_on(m.log_link("https://a.com/x", "Title A", 1)).unwrap();
        m.host.advance(30_001.0);
        let outcome = block_on(m.log_link("https://a.com/x", "Title A", 1)).unwrap();

        assert_eq!(outcome, CaptureOutcome::Recorded);
        let stored = m.host.stored();
        assert_eq!(stored.len(), 2);
        assert!(stored[0].timestamp - stored[1].timestamp > 30_000.0);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let m = monitor();

        for i in 0..201 {
            block_on(m.log_link(&format!("https://site{}.com/", i), "Page", 1)).unwrap();
            m.host.advance(10.0);
        }

        let stored = m.host.stored();
        assert_eq!(stored.len(), 200);
        assert_eq!(stored[0].url, "https://site200.com/");
        assert_eq!(stored[199].url, "https://site1.com/");
        assert!(!stored.iter().any(|l| l.url == "https://site0.com/"));
        assert_eq!(m.host.badge.borrow().0, "MAX");
    }

    #[test]
    fn test_cap_follows_settings() {
        let m = monitor();
        *m.host.settings.borrow_mut() = Some(Settings {
            is_logging_enabled: true,
            max_links: 3,
        });

        for i in 0..10 {
            block_on(m.log_link(&format!("https://site{}.com/", i), "Page", 1)).unwrap();
            m.host.advance(1.0);
        }

        assert_eq!(m.host.stored().len(), 3);
    }

    #[test]
    fn test_collection_stays_sorted_newest_first() {
        let m = monitor();

        for url in ["https://a.com", "https://b.com", "https://a.com", "https://c.com"] {
            block_on(m.log_link(url, "", 1)).unwrap();
            m.host.advance(20_000.0);
        }

        let stored = m.host.stored();
        assert!(stored.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

        // same url never twice within the window
        for (i, a) in stored.iter().enumerate() {
            for b in &stored[i + 1..] {
                if a.url == b.url {
                    assert!((a.timestamp - b.timestamp).abs() >= 30_000.0);
                }
            }
        }
    }

    #[test]
    fn test_internal_pages_are_not_recorded() {
        let m = monitor();

        let outcome = block_on(m.log_link("chrome://settings", "Settings", 1)).unwrap();

        assert_eq!(outcome, CaptureOutcome::Excluded);
        assert!(m.host.stored().is_empty());
    }

    #[test]
    fn test_toggle_logging_stops_and_restores_capture() {
        let m = monitor();

        let ack = block_on(m.handle_command(Command::ToggleLogging { enabled: false }));
        assert!(ack.success);

        let outcome = block_on(m.log_link("https://a.com/x", "A", 1)).unwrap();
        assert_eq!(outcome, CaptureOutcome::LoggingDisabled);
        assert!(m.host.stored().is_empty());

        block_on(m.handle_command(Command::ToggleLogging { enabled: true }));
        let outcome = block_on(m.log_link("https://a.com/x", "A", 1)).unwrap();
        assert_eq!(outcome, CaptureOutcome::Recorded);
        assert_eq!(m.host.stored().len(), 1);
    }

    #[test]
    fn test_toggle_keeps_max_links() {
        let m = monitor();
        *m.host.settings.borrow_mut() = Some(Settings {
            is_logging_enabled: true,
            max_links: 50,
        });

        block_on(m.handle_command(Command::ToggleLogging { enabled: false }));

        let settings = m.host.settings.borrow().clone().unwrap();
        assert!(!settings.is_logging_enabled);
        assert_eq!(settings.max_links, 50);
    }

    #[test]
    fn test_toggle_with_unreadable_settings_keeps_stored_record() {
        let m = monitor();
        *m.host.settings.borrow_mut() = Some(Settings {
            is_logging_enabled: true,
            max_links: 50,
        });
        m.host.fail_reads.set(true);

        let ack = block_on(m.handle_command(Command::ToggleLogging { enabled: false }));

        assert!(ack.success);
        let settings = m.host.settings.borrow().clone().unwrap();
        assert_eq!(settings.max_links, 50);
        assert!(settings.is_logging_enabled);
    }

    #[test]
    fn test_interleaved_captures_both_pass_dedup() {
        // Read-modify-write isn't atomic: both captures see the same
        // snapshot, both are recorded, and the later write wins.
        let m = monitor();
        block_on(m.log_link("https://old.com/", "Old", 1)).unwrap();
        m.host.advance(1_000.0);
        m.host.yield_on_load.set(true);

        let (first, second) = block_on(async {
            futures::join!(
                m.log_link("https://a.com/x", "A", 1),
                m.log_link("https://a.com/x", "A", 2),
            )
        });

        assert_eq!(first.unwrap(), CaptureOutcome::Recorded);
        assert_eq!(second.unwrap(), CaptureOutcome::Recorded);

        let stored = m.host.stored();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].url, "https://a.com/x");
        assert_eq!(stored[0].tab_id, 2);
        assert_eq!(stored[1].url, "https://old.com/");
    }

    #[test]
    fn test_clear_links_empties_collection_and_badge() {
        let m = monitor();
        block_on(m.log_link("https://a.com", "A", 1)).unwrap();
        block_on(m.log_link("https://b.com", "B", 1)).unwrap();

        let ack = block_on(m.handle_command(Command::ClearLinks));

        assert!(ack.success);
        assert!(m.host.stored().is_empty());
        assert_eq!(m.host.badge.borrow().0, "");

        // idempotent
        assert!(block_on(m.handle_command(Command::ClearLinks)).success);
        assert!(m.host.stored().is_empty());
    }

    #[test]
    fn test_install_seeds_defaults() {
        let m = monitor();

        block_on(m.install()).unwrap();
        block_on(m.install()).unwrap();

        assert_eq!(*m.host.settings.borrow(), Some(Settings::default()));
    }

    #[test]
    fn test_restore_badge() {
        let m = monitor();
        block_on(m.log_link("https://a.com", "A", 1)).unwrap();
        m.host.set_badge("", BADGE_COLOR);

        block_on(m.restore_badge()).unwrap();

        assert_eq!(m.host.badge.borrow().0, "1");
    }

    #[test]
    fn test_navigation_event_captures() {
        let m = monitor();

        block_on(m.handle_event(TabEvent::NavigationComplete {
            tab_id: 9,
            url: "https://a.com/x".to_string(),
            title: "A".to_string(),
        }));

        assert_eq!(m.host.stored().len(), 1);
        assert_eq!(m.host.stored()[0].tab_id, 9);
    }

    #[test]
    fn test_activation_of_loaded_tab_captures() {
        let m = monitor();
        m.host.tabs.borrow_mut().insert(4, complete_tab("https://b.com/", "B"));

        block_on(m.handle_event(TabEvent::TabActivated { tab_id: 4 }));

        let stored = m.host.stored();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "B");
        assert_eq!(stored[0].tab_id, 4);
    }

    #[test]
    fn test_activation_of_loading_tab_is_ignored() {
        let m = monitor();
        let mut tab = complete_tab("https://b.com/", "B");
        tab.status = Some("loading".to_string());
        m.host.tabs.borrow_mut().insert(4, tab);

        block_on(m.handle_event(TabEvent::TabActivated { tab_id: 4 }));

        assert!(m.host.stored().is_empty());
    }

    #[test]
    fn test_activation_of_missing_tab_is_swallowed() {
        let m = monitor();

        block_on(m.handle_event(TabEvent::TabActivated { tab_id: 42 }));

        assert!(m.host.stored().is_empty());
    }

    #[test]
    fn test_update_then_activate_same_navigation_stores_once() {
        let m = monitor();
        m.host.tabs.borrow_mut().insert(1, complete_tab("https://a.com/x", "A"));

        block_on(m.handle_event(TabEvent::NavigationComplete {
            tab_id: 1,
            url: "https://a.com/x".to_string(),
            title: "A".to_string(),
        }));
        m.host.advance(5.0);
        block_on(m.handle_event(TabEvent::TabActivated { tab_id: 1 }));

        assert_eq!(m.host.stored().len(), 1);
    }

    #[test]
    fn test_storage_failure_is_returned_then_swallowed() {
        let m = monitor();
        m.host.fail_storage();

        assert!(matches!(
            block_on(m.log_link("https://a.com", "A", 1)),
            Err(CaptureError::Storage(_))
        ));

        // event path and command path don't propagate
        block_on(m.handle_event(TabEvent::NavigationComplete {
            tab_id: 1,
            url: "https://a.com".to_string(),
            title: "A".to_string(),
        }));
        assert!(block_on(m.handle_command(Command::ClearLinks)).success);
        assert!(m.host.links.borrow().is_none());
    }

    #[test]
    fn test_malformed_url_is_an_error() {
        let m = monitor();

        let result = block_on(m.log_link("not a url", "Broken", 1));

        assert!(matches!(result, Err(CaptureError::InvalidUrl(_))));
        assert!(m.host.stored().is_empty());
    }
}
