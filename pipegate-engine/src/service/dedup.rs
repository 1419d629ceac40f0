//! Latest-approval-per-pipeline reduction

use pipegate_core::domain::approval::PendingApproval;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Keeps the most recently created approval of every pipeline
///
/// Input is scanned in order. A stored candidate is replaced only by one
/// with a strictly later `created_on`, so on equal timestamps the first one
/// seen wins; the service does not totally order `createdOn`, and this
/// tie-break is part of the contract. Distinct approvals are never merged.
///
/// The map has no meaningful order; use [`sorted_by_pipeline`] for display
/// or submission order.
pub fn reduce_to_latest_per_pipeline<I>(approvals: I) -> HashMap<String, PendingApproval>
where
    I: IntoIterator<Item = PendingApproval>,
{
    let mut latest: HashMap<String, PendingApproval> = HashMap::new();

    for approval in approvals {
        match latest.entry(approval.pipeline_name.clone()) {
            Entry::Occupied(mut best) => {
                if approval.created_on > best.get().created_on {
                    best.insert(approval);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(approval);
            }
        }
    }

    latest
}

/// Flattens a reduced map into a list ordered by pipeline name
pub fn sorted_by_pipeline(latest: HashMap<String, PendingApproval>) -> Vec<PendingApproval> {
    let mut approvals: Vec<PendingApproval> = latest.into_values().collect();
    approvals.sort_by(|a, b| a.pipeline_name.cmp(&b.pipeline_name));
    approvals
}
