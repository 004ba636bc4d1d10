/// User settings read from chrome.storage.local

use serde::{Deserialize, Serialize};

/// Storage key the settings object lives under
pub const SETTINGS_KEY: &str = "tab_sorter_settings";

/// Toggles for the sorting engine; missing fields take their defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Close duplicate tabs before sorting
    pub dedupe: bool,
    /// Keep tab groups together and restore them after sorting
    pub use_groups: bool,
    /// Slot new tabs next to tabs from the same domain
    pub auto_place: bool,
}

impl Settings {
    pub fn new() -> Self {
        Settings {
            dedupe: true,
            use_groups: true,
            auto_place: true,
        }
    }

    /// Settings without group handling: every unpinned tab is sorted as a loose tab
    pub fn ungrouped() -> Self {
        Settings {
            use_groups: false,
            ..Settings::new()
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}
