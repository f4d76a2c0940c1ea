//! Display ordering: filter by search text, then most urgent first, then most
//! recently updated first.

use crate::core::{Status, TrackedPerson};
use std::cmp::Ordering;

pub fn status_priority(status: Status) -> u8 {
    status.priority()
}

/// Filters `records` by `search_text` and returns them in display order.
///
/// Pure and deterministic: the input is not touched, and records sharing both
/// priority and `last_updated` fall back to id order.
pub fn project(records: &[TrackedPerson], search_text: &str) -> Vec<TrackedPerson> {
    let needle = normalize_search(search_text);
    let mut visible: Vec<TrackedPerson> = records
        .iter()
        .filter(|record| record.matches(&needle))
        .cloned()
        .collect();
    visible.sort_by(display_order);
    visible
}

pub fn display_order(left: &TrackedPerson, right: &TrackedPerson) -> Ordering {
    status_priority(left.status)
        .cmp(&status_priority(right.status))
        .then_with(|| right.last_updated.cmp(&left.last_updated))
        .then_with(|| left.id.cmp(&right.id))
}

/// Case folding only; surrounding whitespace is part of the needle.
pub fn normalize_search(search_text: &str) -> String {
    search_text.to_lowercase()
}

/// Record count per status, in progression order.
pub fn status_counts(records: &[TrackedPerson]) -> [(Status, usize); 5] {
    Status::ALL.map(|status| {
        let count = records.iter().filter(|record| record.status == status).count();
        (status, count)
    })
}
