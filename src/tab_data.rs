/// Data structures for Tab Sorter
use serde::{Deserialize, Serialize};

pub type TabId = i32;
pub type WindowId = i32;
pub type GroupId = i32;

/// Chrome's `chrome.tabGroups.TAB_GROUP_ID_NONE`
pub const TAB_GROUP_ID_NONE: GroupId = -1;

/// Information about a browser tab, as reported by `chrome.tabs.query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    pub id: TabId,
    #[serde(default)]
    pub window_id: WindowId,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub active: bool,
    pub index: usize,
    #[serde(default, with = "group_sentinel")]
    pub group_id: Option<GroupId>,
}

impl TabRecord {
    pub fn new(id: TabId, url: &str, title: &str, index: usize) -> TabRecord {
        TabRecord {
            id,
            window_id: 0,
            url: url.to_string(),
            title: title.to_string(),
            pinned: false,
            active: false,
            index,
            group_id: None,
        }
    }

    pub fn pinned(mut self) -> TabRecord {
        self.pinned = true;
        self
    }

    pub fn active(mut self) -> TabRecord {
        self.active = true;
        self
    }

    pub fn in_group(mut self, group_id: GroupId) -> TabRecord {
        self.group_id = Some(group_id);
        self
    }

    pub fn is_grouped(&self) -> bool {
        self.group_id.is_some()
    }
}

/// Tab group colors supported by `chrome.tabGroups`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    #[default]
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
}

/// Information about a tab group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub id: GroupId,
    #[serde(default)]
    pub window_id: WindowId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub color: GroupColor,
    #[serde(default)]
    pub collapsed: bool,
}

impl GroupRecord {
    pub fn new(id: GroupId, title: &str, color: GroupColor) -> GroupRecord {
        GroupRecord {
            id,
            window_id: 0,
            title: title.to_string(),
            color,
            collapsed: false,
        }
    }

    /// The update that puts this group's metadata back in place
    pub fn restore_update(&self) -> GroupUpdate {
        GroupUpdate {
            title: Some(self.title.clone()),
            color: Some(self.color),
            collapsed: Some(self.collapsed),
        }
    }
}

/// Properties for `chrome.tabGroups.update`; unset fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<GroupColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

impl GroupUpdate {
    pub fn title(title: &str) -> GroupUpdate {
        GroupUpdate {
            title: Some(title.to_string()),
            ..GroupUpdate::default()
        }
    }
}

/// Filter for `chrome.tabs.query`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabQuery {
    pub window_id: WindowId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    /// Restrict to tabs outside any group
    pub ungrouped_only: bool,
}

impl TabQuery {
    pub fn window(window_id: WindowId) -> TabQuery {
        TabQuery {
            window_id,
            pinned: None,
            ungrouped_only: false,
        }
    }

    /// Unpinned, ungrouped tabs of a window
    pub fn loose(window_id: WindowId) -> TabQuery {
        TabQuery {
            window_id,
            pinned: Some(false),
            ungrouped_only: true,
        }
    }

    pub fn matches(&self, tab: &TabRecord) -> bool {
        tab.window_id == self.window_id
            && self.pinned.is_none_or(|pinned| tab.pinned == pinned)
            && !(self.ungrouped_only && tab.is_grouped())
    }
}

/// Read-only snapshot of one window's tabs and groups
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowView {
    pub tabs: Vec<TabRecord>,
    pub groups: Vec<GroupRecord>,
}

impl WindowView {
    pub fn new(mut tabs: Vec<TabRecord>, groups: Vec<GroupRecord>) -> WindowView {
        tabs.sort_by_key(|tab| tab.index);
        WindowView { tabs, groups }
    }

    pub fn tab_ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(|tab| tab.id).collect()
    }

    pub fn group(&self, id: GroupId) -> Option<&GroupRecord> {
        self.groups.iter().find(|group| group.id == id)
    }
}

/// Outcome of a manual sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortStatus {
    Sorted,
    AlreadySorted,
    Error,
}

/// Result handed back to whoever triggered the sort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortResult {
    pub status: SortStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SortResult {
    pub fn ok(status: SortStatus) -> SortResult {
        SortResult { status, error: None }
    }

    pub fn error(message: String) -> SortResult {
        SortResult {
            status: SortStatus::Error,
            error: Some(message),
        }
    }
}

/// Maps the `-1` group sentinel to `None` and back
mod group_sentinel {
    use super::{GroupId, TAB_GROUP_ID_NONE};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<GroupId>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(value.unwrap_or(TAB_GROUP_ID_NONE))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<GroupId>, D::Error> {
        let raw = Option::<GroupId>::deserialize(deserializer)?;
        Ok(raw.filter(|id| *id != TAB_GROUP_ID_NONE))
    }
}
