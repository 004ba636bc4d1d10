/// Placement of newly created tabs next to tabs from the same domain

use crate::domain::effective_domain;
use crate::service::{ServiceError, TabService};
use crate::tab_data::{TabId, TabQuery, TabRecord};
use log::{debug, warn};

/// What happened to a new tab
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    Moved { tab_id: TabId, index: usize },
    /// No same-domain tab, or already in place
    Unchanged,
    /// Pinned, grouped, or without a URL
    Ignored,
    Failed(ServiceError),
}

/// Move a new tab so it sits immediately before the earliest loose tab
/// sharing its effective domain
///
/// Only unpinned, ungrouped tabs are considered; pinned and grouped tabs
/// are never moved or used as anchors. This is not a full sort: without a
/// same-domain tab the new tab stays where the browser put it.
pub async fn place_new_tab(tabs: &dyn TabService, tab: &TabRecord) -> Placement {
    if tab.pinned || tab.is_grouped() || tab.url.is_empty() {
        return Placement::Ignored;
    }

    let domain = effective_domain(&tab.url);
    let loose = match tabs.query_tabs(&TabQuery::loose(tab.window_id)).await {
        Ok(loose) => loose,
        Err(error) => {
            warn!("Could not list tabs to place tab {}: {}", tab.id, error);
            return Placement::Failed(error);
        }
    };

    let Some(anchor) = loose
        .iter()
        .filter(|other| other.id != tab.id && !other.pinned && !other.is_grouped())
        .filter(|other| effective_domain(&other.url) == domain)
        .map(|other| other.index)
        .min()
    else {
        return Placement::Unchanged;
    };

    let current = loose
        .iter()
        .find(|other| other.id == tab.id)
        .map_or(tab.index, |other| other.index);
    // Moving right shifts the anchor left by one
    let index = if current < anchor { anchor - 1 } else { anchor };
    if index == current {
        return Placement::Unchanged;
    }

    match tabs.move_tab(tab.id, index).await {
        Ok(_) => {
            debug!("Placed tab {} at {} next to {}", tab.id, index, domain);
            Placement::Moved { tab_id: tab.id, index }
        }
        Err(error) => {
            warn!("Failed to place tab {}: {}", tab.id, error);
            Placement::Failed(error)
        }
    }
}
