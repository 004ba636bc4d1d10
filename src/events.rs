/// Dispatch of browser notifications to the engine
use crate::placer::{Placement, place_new_tab};
use crate::reconcile::Reconciler;
use crate::service::{TabGroupService, TabService};
use crate::settings::Settings;
use crate::tab_data::{GroupRecord, SortResult, TabId, TabRecord, WindowId};
use log::debug;
use serde::{Deserialize, Serialize};

/// A notification forwarded from the extension's background listeners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BrowserEvent {
    /// The sort shortcut was pressed in a window
    SortCommand { window_id: WindowId },
    TabCreated { tab: TabRecord },
    GroupCreated { group: GroupRecord },
    GroupUpdated { group: GroupRecord },
    GroupRemoved { group: GroupRecord },
    TabAttached { tab_id: TabId, window_id: WindowId },
    TabDetached { tab_id: TabId, window_id: WindowId },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Sort(SortResult),
    Placement(Placement),
    Ignored,
}

/// Run the engine operation an event calls for, if any
///
/// Group and attach/detach notifications never change tab order; there is
/// no cached state for them to refresh, so they are only logged.
pub async fn handle_event(
    tabs: &dyn TabService,
    groups: &dyn TabGroupService,
    settings: &Settings,
    event: BrowserEvent,
) -> EventOutcome {
    match event {
        BrowserEvent::SortCommand { window_id } => {
            EventOutcome::Sort(Reconciler::new(tabs, groups, settings).run(window_id).await)
        }
        BrowserEvent::TabCreated { tab } if settings.auto_place => {
            EventOutcome::Placement(place_new_tab(tabs, &tab).await)
        }
        other => {
            debug!("No action for {:?}", other);
            EventOutcome::Ignored
        }
    }
}
