/// Tab operations: duplicate detection

use crate::tab_data::{TabId, TabRecord};
use std::collections::{BTreeSet, HashMap};
use url::Url;

/// Normalize a URL for duplicate detection by dropping its fragment
///
/// Returns `None` for empty or unparsable URLs; those tabs never count as duplicates.
pub fn normalize_for_dedup(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }

    let mut parsed = Url::parse(url).ok()?;
    parsed.set_fragment(None);
    Some(parsed.into())
}

/// Pick the tabs to close so that each distinct URL is left open once
///
/// For each set of duplicates:
/// - if any member is pinned, every unpinned member is closed and pinned
///   members are never touched
/// - otherwise the active member survives, or failing that the one with the
///   lowest index
pub fn plan_closures(tabs: &[TabRecord]) -> BTreeSet<TabId> {
    let mut by_url: HashMap<String, Vec<&TabRecord>> = HashMap::new();
    for tab in tabs {
        if let Some(key) = normalize_for_dedup(&tab.url) {
            by_url.entry(key).or_default().push(tab);
        }
    }

    let mut closures = BTreeSet::new();
    for members in by_url.values().filter(|members| members.len() > 1) {
        if members.iter().any(|tab| tab.pinned) {
            closures.extend(members.iter().filter(|tab| !tab.pinned).map(|tab| tab.id));
            continue;
        }

        let survivor = members
            .iter()
            .find(|tab| tab.active)
            .or_else(|| members.iter().min_by_key(|tab| tab.index))
            .map(|tab| tab.id);

        closures.extend(
            members
                .iter()
                .map(|tab| tab.id)
                .filter(|id| Some(*id) != survivor),
        );
    }

    closures
}
