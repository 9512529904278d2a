//! Dispatch admission policy (C6): glues the ledger, gate, and ranker into
//! kick/migrate decisions. Every function here is a pure function of its
//! inputs plus the current ledger/gate/clock state -- there is no hidden
//! state machine.

use crate::config::DispatchConfig;
use crate::gate::MigrationGate;
use crate::ledger::HostSlotLedger;
use crate::ranker::HostRanker;
use crate::types::{HostState, TaskSummary};
use tracing::debug;

/// Combines C2-C5 into admission decisions. Does not own a [`crate::queue::PriorityQueue`]
/// or a [`crate::clock::Clock`] -- callers pass `now_ms` explicitly so the
/// policy stays a pure function of its arguments.
pub struct DispatchPolicy<'a> {
    pub ledger: &'a HostSlotLedger,
    pub gate: &'a MigrationGate,
    pub config: &'a DispatchConfig,
}

impl<'a> DispatchPolicy<'a> {
    pub fn new(ledger: &'a HostSlotLedger, gate: &'a MigrationGate, config: &'a DispatchConfig) -> Self {
        Self { ledger, gate, config }
    }

    /// Pick the best host for a new task among `candidates`, which must
    /// already be pre-filtered for eligibility (affinity, liveness, replica
    /// constraints) by the caller.
    pub fn pick_host<'h>(
        &self,
        candidates: &'h [HostState],
        require_free_slot: bool,
    ) -> Option<&'h HostState> {
        if candidates.is_empty() {
            return None;
        }
        let snapshot = self.ledger.snapshot_all();
        let best = HostRanker::best(candidates, &snapshot)?;
        if !require_free_slot {
            return Some(best);
        }
        let host_id = best.host_id.as_deref()?;
        if self.ledger.has_slot(host_id) {
            Some(best)
        } else {
            None
        }
    }

    /// Last-slot delay for new tasks: keeps a multi-slot host's last slot
    /// available for a while before releasing it to a waiting task. A host
    /// the ledger has never observed is treated the same as one with more
    /// than one free slot -- there is no "last slot" to protect yet.
    pub fn may_kick_new_task_on(&self, host: &HostState, time_on_queue_ms: i64) -> bool {
        let Some(host_id) = host.host_id.as_deref() else {
            return false;
        };
        match self.ledger.snapshot_opt(host_id) {
            None => return true,
            Some(effective) if effective > 1 => return true,
            Some(_) => {}
        }
        if host.max_slots == 1 {
            return true;
        }
        time_on_queue_ms > self.config.last_slot_delay_ms
    }

    /// Migration admission: feature switch, basic input validity, a free
    /// slot on the target, and neither endpoint recently touched by a
    /// migration.
    pub fn may_migrate(&self, task: Option<&TaskSummary>, target_host_id: Option<&str>, now_ms: i64) -> bool {
        if !self.config.migration_enabled {
            return false;
        }
        let Some(task) = task else {
            return false;
        };
        let Some(target_host_id) = target_host_id else {
            return false;
        };
        if task.byte_count == 0 {
            return false;
        }
        let Some(current_host_id) = task.current_host_id.as_deref() else {
            return false;
        };

        if !self.ledger.has_slot(target_host_id) {
            debug!(target_host_id, "migration denied: target has no free slot");
            return false;
        }
        let ttl = self.config.migration_interval_per_host_ms;
        if self.gate.recently_touched(current_host_id, now_ms, ttl) {
            debug!(current_host_id, "migration denied: source host in gate window");
            return false;
        }
        if self.gate.recently_touched(target_host_id, now_ms, ttl) {
            debug!(target_host_id, "migration denied: target host in gate window");
            return false;
        }
        true
    }

    /// Growing size ceiling for migration eligibility: tasks below
    /// `migration_min_bytes` are always eligible; the ceiling grows
    /// linearly with time on queue up to `migration_max_bytes` at
    /// `migration_growth_ms`.
    pub fn size_age_admits(&self, byte_count: i64, time_on_queue_ms: i64) -> bool {
        let p = (time_on_queue_ms as f64 / self.config.migration_growth_ms as f64).clamp(0.0, 1.0);
        let min = self.config.migration_min_bytes as f64;
        let max = self.config.migration_max_bytes as f64;
        let limit = min + p * (max - min);
        (byte_count as f64) < limit
    }

    /// Record a completed migration so the gate starts rate-limiting both
    /// endpoints again.
    pub fn mark_pair_migrated(&self, src_host_id: &str, dst_host_id: &str, now_ms: i64) {
        self.gate.mark_pair(src_host_id, dst_host_id, now_ms);
    }
}
