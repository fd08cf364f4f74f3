use std::collections::HashSet;

use crate::types::ReviewRecord;

/// Drop exact `(source, place, comment)` repeats, keeping the first occurrence.
/// Returns the survivors in their original order and how many were removed.
pub fn dedup_records(records: Vec<ReviewRecord>) -> (Vec<ReviewRecord>, usize) {
    let before = records.len();
    let mut seen: HashSet<ReviewRecord> = HashSet::with_capacity(before);
    let kept: Vec<ReviewRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.clone()))
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// Keep only records whose comment is long enough. Returns how many were dropped.
pub fn retain_substantive(records: &mut Vec<ReviewRecord>) -> usize {
    let before = records.len();
    records.retain(ReviewRecord::has_substantive_comment);
    before - records.len()
}
