/// Bridge from the service traits to `chrome.tabs` / `chrome.tabGroups`

use crate::service::{ServiceError, ServiceFuture, TabGroupService, TabService};
use crate::settings::{SETTINGS_KEY, Settings};
use crate::tab_data::{GroupId, GroupRecord, GroupUpdate, TabId, TabQuery, TabRecord, WindowId};
use log::warn;
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/js/chrome_bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryTabs(query: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn moveTab(tab_id: i32, index: u32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn groupTabs(tab_ids: JsValue, group_id: Option<i32>) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn ungroupTabs(tab_ids: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeTabs(tab_ids: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn queryGroups(window_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn updateGroup(group_id: i32, props: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getCurrentWindowId() -> Result<JsValue, JsValue>;
}

/// Chrome's own error messages for vanished tabs and groups
static MISSING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^No (tab|group) with id: (-?\d+)").expect("valid missing-id pattern")
});

/// The browser's tab and tab-group services
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeBrowser;

impl TabService for ChromeBrowser {
    fn query_tabs<'a>(&'a self, query: &'a TabQuery) -> ServiceFuture<'a, Vec<TabRecord>> {
        Box::pin(query_tabs(query))
    }

    fn move_tab(&self, id: TabId, index: usize) -> ServiceFuture<'_, TabRecord> {
        Box::pin(move_tab(id, index))
    }

    fn group_tabs<'a>(
        &'a self,
        tab_ids: &'a [TabId],
        group_id: Option<GroupId>,
    ) -> ServiceFuture<'a, GroupId> {
        Box::pin(group_tabs(tab_ids, group_id))
    }

    fn ungroup_tabs<'a>(&'a self, tab_ids: &'a [TabId]) -> ServiceFuture<'a, ()> {
        Box::pin(ungroup_tabs(tab_ids))
    }

    fn remove_tabs<'a>(&'a self, tab_ids: &'a [TabId]) -> ServiceFuture<'a, ()> {
        Box::pin(remove_tabs(tab_ids))
    }
}

impl TabGroupService for ChromeBrowser {
    fn query_groups(&self, window_id: WindowId) -> ServiceFuture<'_, Vec<GroupRecord>> {
        Box::pin(query_groups(window_id))
    }

    fn update_group<'a>(&'a self, id: GroupId, update: &'a GroupUpdate) -> ServiceFuture<'a, ()> {
        Box::pin(update_group(id, update))
    }
}

async fn query_tabs(query: &TabQuery) -> Result<Vec<TabRecord>, ServiceError> {
    let tabs_js = queryTabs(to_js(query)?).await.map_err(rejected)?;
    from_js(tabs_js)
}

async fn move_tab(id: TabId, index: usize) -> Result<TabRecord, ServiceError> {
    let index = u32::try_from(index)
        .map_err(|_| ServiceError::Rejected(format!("Index out of range: {}", index)))?;
    let tab_js = moveTab(id, index).await.map_err(rejected)?;
    from_js(tab_js)
}

async fn group_tabs(tab_ids: &[TabId], group_id: Option<GroupId>) -> Result<GroupId, ServiceError> {
    let group_js = groupTabs(to_js(tab_ids)?, group_id).await.map_err(rejected)?;
    from_js(group_js)
}

async fn ungroup_tabs(tab_ids: &[TabId]) -> Result<(), ServiceError> {
    ungroupTabs(to_js(tab_ids)?).await.map_err(rejected)
}

async fn remove_tabs(tab_ids: &[TabId]) -> Result<(), ServiceError> {
    removeTabs(to_js(tab_ids)?).await.map_err(rejected)
}

async fn query_groups(window_id: WindowId) -> Result<Vec<GroupRecord>, ServiceError> {
    let groups_js = queryGroups(window_id).await.map_err(rejected)?;
    from_js(groups_js)
}

async fn update_group(id: GroupId, update: &GroupUpdate) -> Result<(), ServiceError> {
    updateGroup(id, to_js(update)?).await.map_err(rejected)
}

/// Read settings from chrome.storage.local, falling back to defaults
pub async fn load_settings() -> Settings {
    match getStorage(SETTINGS_KEY).await {
        Ok(value) if value.is_null() || value.is_undefined() => Settings::default(),
        Ok(value) => serde_wasm_bindgen::from_value(value).unwrap_or_else(|e| {
            warn!("Ignoring malformed settings: {:?}", e);
            Settings::default()
        }),
        Err(e) => {
            warn!("Failed to read settings: {:?}", e);
            Settings::default()
        }
    }
}

/// Id of the window the extension UI was opened from
pub async fn current_window_id() -> Result<WindowId, String> {
    let id_js = getCurrentWindowId()
        .await
        .map_err(|e| format!("Failed to get window: {}", js_message(&e)))?;
    serde_wasm_bindgen::from_value(id_js).map_err(|e| format!("Failed to parse window id: {:?}", e))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, ServiceError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| ServiceError::Rejected(format!("Failed to serialize: {:?}", e)))
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, ServiceError> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| ServiceError::Rejected(format!("Failed to parse: {:?}", e)))
}

fn js_message(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err))
}

fn rejected(err: JsValue) -> ServiceError {
    classify(&js_message(&err))
}

/// Map a rejection message onto the matching [`ServiceError`]
fn classify(message: &str) -> ServiceError {
    let missing = MISSING
        .captures(message)
        .and_then(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str().parse::<i32>().ok()?)));
    match missing {
        Some(("tab", id)) => ServiceError::NoSuchTab(id),
        Some(("group", id)) => ServiceError::NoSuchGroup(id),
        _ => ServiceError::Rejected(message.to_string()),
    }
}
