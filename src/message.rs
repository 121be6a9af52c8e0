/// Popup → background control messages

use serde::{Deserialize, Serialize};

/// A request sent over chrome.runtime.sendMessage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Command {
    /// Drop every stored link and reset the badge
    ClearLinks,
    /// Turn capture on or off
    ToggleLogging { enabled: bool },
}

/// Reply to a `Command`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Ack { success: true }
    }
}
