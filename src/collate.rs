/// Ordering of tabs by (effective domain, title)
use crate::domain::effective_domain;
use crate::tab_data::TabRecord;
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold a string for case- and accent-insensitive comparison
///
/// Decomposes to NFD, drops combining marks, then lowercases, so that
/// "Éclair", "eclair" and "ECLAIR" all compare equal.
pub fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare two strings with the collation used for every ordering in the crate
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

/// Compare two tabs by effective domain, then by title
pub fn compare_tabs(a: &TabRecord, b: &TabRecord) -> Ordering {
    collate(&effective_domain(&a.url), &effective_domain(&b.url))
        .then_with(|| collate(&a.title, &b.title))
}

/// Stable sort by [`compare_tabs`]; tabs that compare equal keep their input order
pub fn sort_tabs(tabs: &mut [TabRecord]) {
    // Keys are computed once per tab; `sort_by_cached_key` is stable
    tabs.sort_by_cached_key(|tab| {
        (
            collation_key(&effective_domain(&tab.url)),
            collation_key(&tab.title),
        )
    });
}
