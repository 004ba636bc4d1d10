//! Window-wide sort: dedupe, compute the target layout, then drive the
//! browser towards it.
//!
//! The target layout is pinned tabs (untouched), then each group's tabs with
//! groups in title order, then loose tabs. Every tab and group is handled
//! independently: a rejected call is recorded in the [`ReconcileReport`] and
//! the sort carries on. Only failing to read the window aborts.

use crate::collate::{collation_key, sort_tabs};
use crate::errors::{Failure, Operation, SortError};
use crate::operations::plan_closures;
use crate::service::{TabGroupService, TabService};
use crate::settings::Settings;
use crate::tab_data::{
    GroupId, GroupRecord, GroupUpdate, SortResult, SortStatus, TabId, TabQuery, TabRecord,
    WindowId, WindowView,
};
use log::{debug, info, warn};

/// One group's slot in the target layout
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPlan {
    pub group_id: GroupId,
    /// Metadata to restore; `None` when the group was missing from the snapshot
    pub record: Option<GroupRecord>,
    pub tab_ids: Vec<TabId>,
}

impl GroupPlan {
    pub fn title(&self) -> &str {
        self.record.as_ref().map_or("", |record| record.title.as_str())
    }
}

/// The order a window should end up in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetLayout {
    pub pinned: Vec<TabId>,
    pub groups: Vec<GroupPlan>,
    pub ungrouped: Vec<TabId>,
}

impl TargetLayout {
    /// Partition and sort a snapshot
    ///
    /// Pinned tabs keep their relative order. Each group's tabs and the loose
    /// tabs are sorted by domain and title; groups are sorted by title, with
    /// ties kept in the order the groups first appear. With `use_groups` off
    /// grouped tabs are sorted as loose tabs.
    pub fn compute(view: &WindowView, use_groups: bool) -> TargetLayout {
        let mut pinned = Vec::new();
        let mut buckets: Vec<(GroupId, Vec<TabRecord>)> = Vec::new();
        let mut loose = Vec::new();

        for tab in &view.tabs {
            if tab.pinned {
                pinned.push(tab.id);
                continue;
            }
            match tab.group_id.filter(|_| use_groups) {
                Some(group_id) => match buckets.iter_mut().find(|(id, _)| *id == group_id) {
                    Some((_, bucket)) => bucket.push(tab.clone()),
                    None => buckets.push((group_id, vec![tab.clone()])),
                },
                None => loose.push(tab.clone()),
            }
        }

        let mut groups: Vec<GroupPlan> = buckets
            .into_iter()
            .map(|(group_id, mut tabs)| {
                sort_tabs(&mut tabs);
                GroupPlan {
                    group_id,
                    record: view.group(group_id).cloned(),
                    tab_ids: tabs.iter().map(|tab| tab.id).collect(),
                }
            })
            .collect();
        groups.sort_by_cached_key(|plan| collation_key(plan.title()));

        sort_tabs(&mut loose);

        TargetLayout {
            pinned,
            groups,
            ungrouped: loose.iter().map(|tab| tab.id).collect(),
        }
    }

    /// Tab ids in target order; a tab's position here is its target index
    pub fn order(&self) -> Vec<TabId> {
        self.pinned
            .iter()
            .chain(self.groups.iter().flat_map(|plan| plan.tab_ids.iter()))
            .chain(self.ungrouped.iter())
            .copied()
            .collect()
    }
}

/// What a sort did
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileReport {
    pub status: SortStatus,
    /// Duplicates a removal was requested for
    pub closed: Vec<TabId>,
    /// Moves the browser accepted
    pub moved: usize,
    /// Failures absorbed along the way
    pub failures: Vec<Failure>,
    /// The snapshot the target layout was computed from
    pub view: WindowView,
}

/// Sorts one window per call; holds no state between calls
pub struct Reconciler<'a> {
    tabs: &'a dyn TabService,
    groups: &'a dyn TabGroupService,
    settings: &'a Settings,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        tabs: &'a dyn TabService,
        groups: &'a dyn TabGroupService,
        settings: &'a Settings,
    ) -> Self {
        Reconciler {
            tabs,
            groups,
            settings,
        }
    }

    /// Sort a window and fold the outcome into the result handed to callers
    pub async fn run(&self, window_id: WindowId) -> SortResult {
        match self.sort_window(window_id).await {
            Ok(report) => SortResult::ok(report.status),
            Err(err) => {
                warn!("Sort aborted: {}", err);
                SortResult::error(err.to_string())
            }
        }
    }

    pub async fn sort_window(&self, window_id: WindowId) -> Result<ReconcileReport, SortError> {
        let mut view = self.snapshot(window_id).await?;
        let mut failures = Vec::new();

        let closed = if self.settings.dedupe {
            self.close_duplicates(window_id, &mut view, &mut failures).await
        } else {
            Vec::new()
        };

        let layout = TargetLayout::compute(&view, self.settings.use_groups);
        let target = layout.order();
        debug!("Window {} target order: {:?}", window_id, target);

        if view.tab_ids() == target {
            let status = if closed.is_empty() {
                SortStatus::AlreadySorted
            } else {
                SortStatus::Sorted
            };
            info!("Window {} already in order", window_id);
            return Ok(ReconcileReport {
                status,
                closed,
                moved: 0,
                failures,
                view,
            });
        }

        let moved = self.move_into_place(&layout, &mut failures).await;
        if self.settings.use_groups {
            self.regroup(&layout, &mut failures).await;
        }

        info!(
            "Sorted window {}: {} moved, {} closed, {} failures",
            window_id,
            moved,
            closed.len(),
            failures.len()
        );
        Ok(ReconcileReport {
            status: SortStatus::Sorted,
            closed,
            moved,
            failures,
            view,
        })
    }

    async fn snapshot(&self, window_id: WindowId) -> Result<WindowView, SortError> {
        let enumerate = |source| SortError::Enumerate { window_id, source };

        let tabs = self
            .tabs
            .query_tabs(&TabQuery::window(window_id))
            .await
            .map_err(enumerate)?;
        let groups = if self.settings.use_groups {
            self.groups.query_groups(window_id).await.map_err(enumerate)?
        } else {
            Vec::new()
        };

        Ok(WindowView::new(tabs, groups))
    }

    /// Close duplicates and refresh `view`; returns the ids a removal was requested for
    async fn close_duplicates(
        &self,
        window_id: WindowId,
        view: &mut WindowView,
        failures: &mut Vec<Failure>,
    ) -> Vec<TabId> {
        let closing: Vec<TabId> = plan_closures(&view.tabs).into_iter().collect();
        if closing.is_empty() {
            return closing;
        }

        debug!("Closing duplicates: {:?}", closing);
        if let Err(error) = self.tabs.remove_tabs(&closing).await {
            // Tabs closed concurrently are not an error
            debug!("Removing duplicates: {}", error);
            failures.push(Failure::Operation {
                op: Operation::Remove(closing.clone()),
                error,
            });
        }

        match self.tabs.query_tabs(&TabQuery::window(window_id)).await {
            Ok(tabs) => *view = WindowView::new(tabs, std::mem::take(&mut view.groups)),
            Err(error) => {
                warn!("Re-reading window {} failed, using snapshot: {}", window_id, error);
                view.tabs.retain(|tab| !closing.contains(&tab.id));
            }
        }

        closing
    }

    /// Move every unpinned tab to its target index, lowest index first
    async fn move_into_place(&self, layout: &TargetLayout, failures: &mut Vec<Failure>) -> usize {
        let mut moved = 0;
        for (index, &tab_id) in layout.order().iter().enumerate().skip(layout.pinned.len()) {
            match self.tabs.move_tab(tab_id, index).await {
                Ok(_) => moved += 1,
                Err(error) => {
                    warn!("Failed to move tab {} to {}: {}", tab_id, index, error);
                    failures.push(Failure::Operation {
                        op: Operation::Move { tab_id, index },
                        error,
                    });
                }
            }
        }
        moved
    }

    /// Put each group's tabs back into a group, then restore its metadata
    async fn regroup(&self, layout: &TargetLayout, failures: &mut Vec<Failure>) {
        let mut restored = Vec::new();
        for plan in &layout.groups {
            if let Some(group_id) = self.reassign(plan, failures).await {
                restored.push((plan, group_id));
            }
        }

        for (plan, group_id) in restored {
            let Some(record) = &plan.record else {
                continue;
            };
            if let Err(error) = self.groups.update_group(group_id, &record.restore_update()).await {
                warn!("Failed to restore group {}: {}", group_id, error);
                failures.push(Failure::Operation {
                    op: Operation::UpdateGroup { group_id },
                    error,
                });
            }
        }
    }

    /// Re-apply membership for one group; returns the id the tabs ended up in
    async fn reassign(&self, plan: &GroupPlan, failures: &mut Vec<Failure>) -> Option<GroupId> {
        let error = match self.tabs.group_tabs(&plan.tab_ids, Some(plan.group_id)).await {
            Ok(group_id) => return Some(group_id),
            Err(error) => error,
        };

        warn!("Group {} is gone, recreating it: {}", plan.group_id, error);
        failures.push(Failure::Structural {
            group_id: plan.group_id,
            error,
        });

        match self.tabs.group_tabs(&plan.tab_ids, None).await {
            Ok(group_id) => {
                if let Err(error) = self
                    .groups
                    .update_group(group_id, &GroupUpdate::title(plan.title()))
                    .await
                {
                    failures.push(Failure::Operation {
                        op: Operation::UpdateGroup { group_id },
                        error,
                    });
                }
                Some(group_id)
            }
            Err(error) => {
                warn!("Leaving tabs {:?} ungrouped: {}", plan.tab_ids, error);
                failures.push(Failure::Operation {
                    op: Operation::CreateGroup,
                    error,
                });
                if let Err(error) = self.tabs.ungroup_tabs(&plan.tab_ids).await {
                    failures.push(Failure::Operation {
                        op: Operation::Ungroup(plan.tab_ids.clone()),
                        error,
                    });
                }
                None
            }
        }
    }
}
