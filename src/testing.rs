//! In-memory browser used by the engine tests.
//!
//! Emulates the parts of Chrome's tab model the engine relies on: moves
//! reindex the window, grouping into a missing group is rejected, and groups
//! left without tabs disappear. Every call is recorded, and individual calls
//! can be made to fail.

use crate::service::{ServiceError, ServiceFuture, TabGroupService, TabService};
use crate::tab_data::{
    GroupColor, GroupId, GroupRecord, GroupUpdate, TabId, TabQuery, TabRecord, WindowId,
};
use std::cell::RefCell;
use std::collections::HashSet;

pub const WINDOW: WindowId = 1;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    QueryTabs,
    QueryGroups,
    Move(TabId, usize),
    Group(Vec<TabId>, Option<GroupId>),
    Ungroup(Vec<TabId>),
    Remove(Vec<TabId>),
    Update(GroupId, GroupUpdate),
}

impl Call {
    fn is_query(&self) -> bool {
        matches!(self, Call::QueryTabs | Call::QueryGroups)
    }
}

#[derive(Default)]
struct State {
    tabs: Vec<TabRecord>,
    groups: Vec<GroupRecord>,
    next_group_id: GroupId,
    calls: Vec<Call>,
    tab_queries: usize,
    tab_queries_allowed: Option<usize>,
    fail_group_query: bool,
    fail_moves: HashSet<TabId>,
    fail_regroup: HashSet<GroupId>,
    fail_updates: HashSet<GroupId>,
    fail_create: bool,
}

impl State {
    fn reindex(&mut self) {
        for (index, tab) in self.tabs.iter_mut().enumerate() {
            tab.index = index;
        }
    }

    fn prune_groups(&mut self) {
        let live: HashSet<GroupId> = self.tabs.iter().filter_map(|t| t.group_id).collect();
        self.groups.retain(|g| live.contains(&g.id));
    }

    fn missing(&self, tab_ids: &[TabId]) -> Option<TabId> {
        tab_ids
            .iter()
            .copied()
            .find(|id| !self.tabs.iter().any(|t| t.id == *id))
    }

    fn set_group(&mut self, tab_ids: &[TabId], group_id: Option<GroupId>) {
        for tab in self.tabs.iter_mut().filter(|t| tab_ids.contains(&t.id)) {
            tab.group_id = group_id;
        }
        self.prune_groups();
    }
}

pub struct FakeBrowser {
    state: RefCell<State>,
}

impl FakeBrowser {
    /// A single window holding `tabs` in the given order
    pub fn new(tabs: Vec<TabRecord>, groups: Vec<GroupRecord>) -> FakeBrowser {
        let mut state = State {
            tabs,
            groups,
            next_group_id: 100,
            ..State::default()
        };
        for tab in &mut state.tabs {
            tab.window_id = WINDOW;
        }
        for group in &mut state.groups {
            group.window_id = WINDOW;
        }
        state.reindex();
        FakeBrowser {
            state: RefCell::new(state),
        }
    }

    pub fn with_tabs(tabs: Vec<TabRecord>) -> FakeBrowser {
        FakeBrowser::new(tabs, Vec::new())
    }

    /// Let `n` tab queries succeed, then reject the rest
    pub fn fail_tab_queries_after(&self, n: usize) {
        self.state.borrow_mut().tab_queries_allowed = Some(n);
    }

    pub fn fail_group_query(&self) {
        self.state.borrow_mut().fail_group_query = true;
    }

    pub fn fail_move(&self, tab_id: TabId) {
        self.state.borrow_mut().fail_moves.insert(tab_id);
    }

    /// Reject re-assignment into an existing group, as if it had been closed
    pub fn fail_regroup(&self, group_id: GroupId) {
        self.state.borrow_mut().fail_regroup.insert(group_id);
    }

    pub fn fail_update(&self, group_id: GroupId) {
        self.state.borrow_mut().fail_updates.insert(group_id);
    }

    pub fn fail_create_group(&self) {
        self.state.borrow_mut().fail_create = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Every recorded call except queries
    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| !c.is_query()).collect()
    }

    pub fn order(&self) -> Vec<TabId> {
        self.state.borrow().tabs.iter().map(|t| t.id).collect()
    }

    pub fn tab(&self, id: TabId) -> Option<TabRecord> {
        self.state.borrow().tabs.iter().find(|t| t.id == id).cloned()
    }

    pub fn group(&self, id: GroupId) -> Option<GroupRecord> {
        self.state.borrow().groups.iter().find(|g| g.id == id).cloned()
    }

    pub fn members(&self, group_id: GroupId) -> Vec<TabId> {
        self.state
            .borrow()
            .tabs
            .iter()
            .filter(|t| t.group_id == Some(group_id))
            .map(|t| t.id)
            .collect()
    }

    /// Close a tab behind the engine's back
    pub fn close(&self, id: TabId) {
        let mut state = self.state.borrow_mut();
        state.tabs.retain(|t| t.id != id);
        state.reindex();
        state.prune_groups();
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl TabService for FakeBrowser {
    fn query_tabs<'a>(&'a self, query: &'a TabQuery) -> ServiceFuture<'a, Vec<TabRecord>> {
        Box::pin(async move {
            self.record(Call::QueryTabs);
            let mut state = self.state.borrow_mut();
            state.tab_queries += 1;
            if state.tab_queries_allowed.is_some_and(|n| state.tab_queries > n) {
                return Err(ServiceError::Rejected("Tabs cannot be queried right now".to_string()));
            }
            Ok(state.tabs.iter().filter(|t| query.matches(t)).cloned().collect())
        })
    }

    fn move_tab(&self, id: TabId, index: usize) -> ServiceFuture<'_, TabRecord> {
        Box::pin(async move {
            self.record(Call::Move(id, index));
            let mut state = self.state.borrow_mut();
            let position = state.tabs.iter().position(|t| t.id == id);
            let Some(position) = position.filter(|_| !state.fail_moves.contains(&id)) else {
                return Err(ServiceError::NoSuchTab(id));
            };
            let tab = state.tabs.remove(position);
            let index = index.min(state.tabs.len());
            state.tabs.insert(index, tab);
            state.reindex();
            Ok(state.tabs[index].clone())
        })
    }

    fn group_tabs<'a>(
        &'a self,
        tab_ids: &'a [TabId],
        group_id: Option<GroupId>,
    ) -> ServiceFuture<'a, GroupId> {
        Box::pin(async move {
            self.record(Call::Group(tab_ids.to_vec(), group_id));
            let mut state = self.state.borrow_mut();
            if let Some(id) = state.missing(tab_ids) {
                return Err(ServiceError::NoSuchTab(id));
            }
            let group_id = match group_id {
                Some(id) => {
                    if state.fail_regroup.contains(&id) || !state.groups.iter().any(|g| g.id == id) {
                        return Err(ServiceError::NoSuchGroup(id));
                    }
                    id
                }
                None => {
                    if state.fail_create {
                        return Err(ServiceError::Rejected("Cannot create group".to_string()));
                    }
                    let id = state.next_group_id;
                    state.next_group_id += 1;
                    let mut group = GroupRecord::new(id, "", GroupColor::Grey);
                    group.window_id = WINDOW;
                    state.groups.push(group);
                    id
                }
            };
            state.set_group(tab_ids, Some(group_id));
            Ok(group_id)
        })
    }

    fn ungroup_tabs<'a>(&'a self, tab_ids: &'a [TabId]) -> ServiceFuture<'a, ()> {
        Box::pin(async move {
            self.record(Call::Ungroup(tab_ids.to_vec()));
            self.state.borrow_mut().set_group(tab_ids, None);
            Ok(())
        })
    }

    fn remove_tabs<'a>(&'a self, tab_ids: &'a [TabId]) -> ServiceFuture<'a, ()> {
        Box::pin(async move {
            self.record(Call::Remove(tab_ids.to_vec()));
            let mut state = self.state.borrow_mut();
            let missing = state.missing(tab_ids);
            state.tabs.retain(|t| !tab_ids.contains(&t.id));
            state.reindex();
            state.prune_groups();
            match missing {
                Some(id) => Err(ServiceError::NoSuchTab(id)),
                None => Ok(()),
            }
        })
    }
}

impl TabGroupService for FakeBrowser {
    fn query_groups(&self, window_id: WindowId) -> ServiceFuture<'_, Vec<GroupRecord>> {
        Box::pin(async move {
            self.record(Call::QueryGroups);
            let state = self.state.borrow();
            if state.fail_group_query {
                return Err(ServiceError::Rejected("Groups cannot be queried right now".to_string()));
            }
            Ok(state.groups.iter().filter(|g| g.window_id == window_id).cloned().collect())
        })
    }

    fn update_group<'a>(&'a self, id: GroupId, update: &'a GroupUpdate) -> ServiceFuture<'a, ()> {
        Box::pin(async move {
            self.record(Call::Update(id, update.clone()));
            let mut state = self.state.borrow_mut();
            if state.fail_updates.contains(&id) {
                return Err(ServiceError::Rejected(format!("Cannot update group {}", id)));
            }
            let Some(group) = state.groups.iter_mut().find(|g| g.id == id) else {
                return Err(ServiceError::NoSuchGroup(id));
            };
            if let Some(title) = &update.title {
                group.title = title.clone();
            }
            if let Some(color) = update.color {
                group.color = color;
            }
            if let Some(collapsed) = update.collapsed {
                group.collapsed = collapsed;
            }
            Ok(())
        })
    }
}
