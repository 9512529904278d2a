//! Pure host ordering (C4).

use crate::types::HostState;
use std::collections::HashMap;

/// Orders candidate hosts by effective free slots (descending), then by
/// mean active tasks (ascending). Callers must pass in a single consistent
/// `ledger` snapshot (e.g. from [`crate::ledger::HostSlotLedger::snapshot_all`])
/// so the two reads being compared come from the same ledger state. This
/// function does not re-check liveness or any other eligibility filter:
/// `candidates` must already be pre-filtered.
pub struct HostRanker;

impl HostRanker {
    /// Pick the best host among `candidates`, or `None` if empty.
    pub fn best<'a>(
        candidates: &'a [HostState],
        ledger: &HashMap<String, i64>,
    ) -> Option<&'a HostState> {
        candidates.iter().max_by(|a, b| {
            let slots_a = host_slots(a, ledger);
            let slots_b = host_slots(b, ledger);
            // Descending effective free slots...
            slots_a
                .cmp(&slots_b)
                // ...then ascending mean active tasks (so lower load wins,
                // which under max_by means reversing the natural order).
                .then_with(|| b.mean_active_tasks.total_cmp(&a.mean_active_tasks))
        })
    }
}

fn host_slots(host: &HostState, ledger: &HashMap<String, i64>) -> i64 {
    host.host_id
        .as_deref()
        .and_then(|id| ledger.get(id))
        .copied()
        .unwrap_or(0)
}
