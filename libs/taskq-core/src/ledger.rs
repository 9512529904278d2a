//! Host-slot ledger (C2): the effective available-slot count per host,
//! accounting for kicks emitted but not yet reflected in a fresh
//! [`HostState`] refresh.

use crate::types::HostState;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::warn;

struct Inner {
    slots: HashMap<String, i64>,
    last_refresh_ms: i64,
}

/// Eventually-consistent, strictly-conservative-between-refreshes map of
/// `hostId -> availableSlots`.
///
/// All mutation serializes on a single internal mutex; a refresh is an
/// atomic swap of the whole map under that same mutex, so no caller ever
/// observes a half-refreshed ledger.
pub struct HostSlotLedger {
    inner: Mutex<Inner>,
}

impl Default for HostSlotLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl HostSlotLedger {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                slots: HashMap::new(),
                last_refresh_ms: i64::MIN,
            }),
        }
    }

    /// Credit one slot back to `host_id` (a completion event).
    pub fn mark_available(&self, host_id: &str) {
        let mut inner = self.inner.lock();
        *inner.slots.entry(host_id.to_string()).or_insert(0) += 1;
    }

    /// Debit one slot from `host_id` (a kick), clamped at zero so a missed
    /// completion event cannot drive the ledger negative (I1).
    pub fn mark_kicked(&self, host_id: &str) {
        let mut inner = self.inner.lock();
        let entry = inner.slots.entry(host_id.to_string()).or_insert(0);
        if *entry <= 0 {
            if *entry < 0 {
                warn!(host_id, value = *entry, "ledger observed negative, clamping to zero");
            }
            *entry = 0;
            return;
        }
        *entry -= 1;
    }

    /// `true` iff `host_id` has at least one effective free slot.
    pub fn has_slot(&self, host_id: &str) -> bool {
        self.snapshot(host_id) > 0
    }

    /// Read-only accessor for a single host's effective slot count. Absent
    /// hosts read as zero.
    pub fn snapshot(&self, host_id: &str) -> i64 {
        self.snapshot_opt(host_id).unwrap_or(0)
    }

    /// Like [`HostSlotLedger::snapshot`], but distinguishes an absent host
    /// (`None`) from one credited/debited down to exactly zero (`Some(0)`).
    pub fn snapshot_opt(&self, host_id: &str) -> Option<i64> {
        let inner = self.inner.lock();
        inner.slots.get(host_id).copied()
    }

    /// Snapshot the whole ledger, for callers (like [`crate::ranker`]) that
    /// must compare two hosts under one consistent view.
    pub fn snapshot_all(&self) -> HashMap<String, i64> {
        self.inner.lock().slots.clone()
    }

    /// Replace the entire ledger with `hosts`, unless less than
    /// `refresh_interval_ms` has elapsed since the last refresh. Hosts with
    /// a `None` id are skipped.
    pub fn refresh_from(&self, hosts: &[HostState], now_ms: i64, refresh_interval_ms: i64) {
        let mut inner = self.inner.lock();
        if now_ms - inner.last_refresh_ms < refresh_interval_ms {
            return;
        }
        let mut slots = HashMap::with_capacity(hosts.len());
        for host in hosts {
            if let Some(id) = &host.host_id {
                slots.insert(id.clone(), host.available_slots);
            }
        }
        inner.slots = slots;
        inner.last_refresh_ms = now_ms;
    }
}
