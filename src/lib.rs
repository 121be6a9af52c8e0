/// Link Locker - Chrome Extension that keeps a list of visited links
/// Built with Rust + WASM + Yew

mod chrome;
mod domain;
mod error;
mod host;
mod link_data;
mod message;
mod monitor;
mod operations;
mod storage;
pub mod ui;

use wasm_bindgen::prelude::*;

use crate::chrome::ChromeHost;
use crate::host::TabEvent;
use crate::link_data::TabSnapshot;
use crate::message::Command;
use crate::monitor::CaptureMonitor;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

#[derive(serde::Deserialize)]
struct ChangeInfo {
    #[serde(default)]
    status: Option<String>,
}

fn monitor() -> CaptureMonitor<ChromeHost> {
    CaptureMonitor::new(ChromeHost)
}

// Background service worker entry points

#[wasm_bindgen]
pub async fn on_installed() {
    if let Err(e) = monitor().install().await {
        log::error!("Failed to seed settings: {}", e);
    }
}

#[wasm_bindgen]
pub async fn on_startup() {
    if let Err(e) = monitor().restore_badge().await {
        log::warn!("Failed to restore badge: {}", e);
    }
}

#[wasm_bindgen]
pub async fn on_tab_updated(tab_id: i32, change_info: JsValue, tab: JsValue) {
    let change: ChangeInfo = match serde_wasm_bindgen::from_value(change_info) {
        Ok(change) => change,
        Err(e) => {
            log::warn!("Unreadable tab change for {}: {:?}", tab_id, e);
            return;
        }
    };
    let tab: TabSnapshot = match serde_wasm_bindgen::from_value(tab) {
        Ok(tab) => tab,
        Err(e) => {
            log::warn!("Unreadable tab {}: {:?}", tab_id, e);
            return;
        }
    };

    if let Some(event) = TabEvent::from_update(tab_id, change.status.as_deref(), &tab) {
        monitor().handle_event(event).await;
    }
}

#[wasm_bindgen]
pub async fn on_tab_activated(tab_id: i32) {
    monitor().handle_event(TabEvent::TabActivated { tab_id }).await;
}

/// Handle a popup message; `undefined` for requests that aren't commands
#[wasm_bindgen]
pub async fn on_message(request: JsValue) -> JsValue {
    let command: Command = match serde_wasm_bindgen::from_value(request) {
        Ok(command) => command,
        Err(e) => {
            log::warn!("Ignoring unknown message: {:?}", e);
            return JsValue::UNDEFINED;
        }
    };

    let ack = monitor().handle_command(command).await;
    serde_wasm_bindgen::to_value(&ack).unwrap_or(JsValue::UNDEFINED)
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
