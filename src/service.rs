//! Contracts for the browser's tab and tab-group services.
//!
//! The engine never owns tab state: it reads snapshots through these traits
//! and issues commands through them. Each call may suspend and may fail on
//! its own. Futures are boxed so the traits stay object-safe and do not
//! require `Send`, which the single-threaded WASM bridge cannot provide.

use crate::tab_data::{GroupId, GroupRecord, GroupUpdate, TabId, TabQuery, TabRecord, WindowId};
use std::{future::Future, pin::Pin};
use thiserror::Error;

/// Object-safe boxed future used by [`TabService`] and [`TabGroupService`].
pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ServiceError>> + 'a>>;

/// A rejected service call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("No tab with id: {0}")]
    NoSuchTab(TabId),

    #[error("No group with id: {0}")]
    NoSuchGroup(GroupId),

    #[error("{0}")]
    Rejected(String),
}

/// Tab operations (`chrome.tabs`).
pub trait TabService {
    /// Lists tabs matching `query`.
    fn query_tabs<'a>(&'a self, query: &'a TabQuery) -> ServiceFuture<'a, Vec<TabRecord>>;

    /// Moves a tab to `index` within its window.
    fn move_tab(&self, id: TabId, index: usize) -> ServiceFuture<'_, TabRecord>;

    /// Adds tabs to `group_id`, or to a newly created group when `None`.
    fn group_tabs<'a>(
        &'a self,
        tab_ids: &'a [TabId],
        group_id: Option<GroupId>,
    ) -> ServiceFuture<'a, GroupId>;

    /// Removes tabs from whatever group they are in.
    fn ungroup_tabs<'a>(&'a self, tab_ids: &'a [TabId]) -> ServiceFuture<'a, ()>;

    /// Closes tabs.
    fn remove_tabs<'a>(&'a self, tab_ids: &'a [TabId]) -> ServiceFuture<'a, ()>;
}

/// Tab group operations (`chrome.tabGroups`).
pub trait TabGroupService {
    /// Lists the groups of a window.
    fn query_groups(&self, window_id: WindowId) -> ServiceFuture<'_, Vec<GroupRecord>>;

    /// Applies title/color/collapsed changes to a group.
    fn update_group<'a>(&'a self, id: GroupId, update: &'a GroupUpdate) -> ServiceFuture<'a, ()>;
}
