use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One progress bar as presented by the source page.
///
/// The title doubles as the comparison key; values are percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressItem {
    pub title: String,
    pub link: String,
    pub value: i64,
}

/// A notification-worthy transition for a single progress bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressChange {
    pub title: String,
    pub link: String,
    pub old_value: i64,
    pub value: i64,
    pub is_new: bool,
}

/// Compare the previous snapshot against the current one.
///
/// Returns the changed and newly appeared items in the source's presentation
/// order. Items with an unchanged value are omitted, and items that were
/// present before but are gone now are not reported at all; a disappearing
/// bar is not actionable. An empty result means nothing happened.
pub fn diff_progress(previous: &[ProgressItem], current: &[ProgressItem]) -> Vec<ProgressChange> {
    let keyed: HashMap<&str, &ProgressItem> = previous
        .iter()
        .map(|item| (item.title.as_str(), item))
        .collect();

    let mut changes = Vec::with_capacity(current.len());
    for item in current {
        let existing = keyed.get(item.title.as_str());
        let is_new = existing.is_none();
        let old_value = existing.map_or(0, |previous| previous.value);

        if is_new || old_value != item.value {
            changes.push(ProgressChange {
                title: item.title.clone(),
                link: item.link.clone(),
                old_value,
                value: item.value,
                is_new,
            });
        }
    }

    changes
}
