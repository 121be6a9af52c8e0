/// chrome.* implementation of the host traits

use wasm_bindgen::prelude::*;

use crate::error::CaptureError;
use crate::host::{Badge, Clock, LinkStore, TabLookup};
use crate::link_data::{Settings, TabSnapshot};
use crate::storage::LinkLog;

// Import JS bridge functions
#[wasm_bindgen(module = "/host.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn loadSettings() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn storeSettings(settings: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn loadLinks() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn storeLinks(links: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getTab(tab_id: i32) -> Result<JsValue, JsValue>;

    fn setBadge(text: &str, color: &str);
}

/// Host backed by the running browser
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeHost;

impl LinkStore for ChromeHost {
    async fn load_settings(&self) -> Result<Settings, CaptureError> {
        let settings_js = loadSettings()
            .await
            .map_err(|e| CaptureError::Storage(format!("Failed to get settings: {:?}", e)))?;

        if settings_js.is_null() || settings_js.is_undefined() {
            Ok(Settings::default())
        } else {
            serde_wasm_bindgen::from_value(settings_js)
                .map_err(|e| CaptureError::Storage(format!("Failed to parse settings: {:?}", e)))
        }
    }

    async fn store_settings(&self, settings: &Settings) -> Result<(), CaptureError> {
        let settings_js = serde_wasm_bindgen::to_value(settings)
            .map_err(|e| CaptureError::Storage(format!("Failed to serialize settings: {:?}", e)))?;

        storeSettings(settings_js)
            .await
            .map_err(|e| CaptureError::Storage(format!("Failed to save settings: {:?}", e)))
    }

    async fn load_links(&self) -> Result<LinkLog, CaptureError> {
        let links_js = loadLinks()
            .await
            .map_err(|e| CaptureError::Storage(format!("Failed to get links: {:?}", e)))?;

        if links_js.is_null() || links_js.is_undefined() {
            Ok(LinkLog::new())
        } else {
            serde_wasm_bindgen::from_value(links_js)
                .map_err(|e| CaptureError::Storage(format!("Failed to parse links: {:?}", e)))
        }
    }

    async fn store_links(&self, links: &LinkLog) -> Result<(), CaptureError> {
        let links_js = serde_wasm_bindgen::to_value(links)
            .map_err(|e| CaptureError::Storage(format!("Failed to serialize links: {:?}", e)))?;

        storeLinks(links_js)
            .await
            .map_err(|e| CaptureError::Storage(format!("Failed to save links: {:?}", e)))
    }
}

impl TabLookup for ChromeHost {
    async fn get_tab(&self, tab_id: i32) -> Result<TabSnapshot, CaptureError> {
        let tab_js = getTab(tab_id)
            .await
            .map_err(|e| CaptureError::Host(format!("Failed to get tab {}: {:?}", tab_id, e)))?;

        serde_wasm_bindgen::from_value(tab_js)
            .map_err(|e| CaptureError::Host(format!("Failed to parse tab {}: {:?}", tab_id, e)))
    }
}

impl Badge for ChromeHost {
    fn set_badge(&self, text: &str, color: &str) {
        setBadge(text, color);
    }
}

impl Clock for ChromeHost {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}
