//! Migration rate-limiter (C3): a bounded-TTL set of hosts that recently
//! took part in a migration.

use dashmap::DashMap;

/// Rate-limits migrations so no host participates in more than one per
/// `MIGRATION_INTERVAL_PER_HOST`. Internally synchronized (`DashMap`); safe
/// for concurrent access without an external lock, and may be read while
/// holding the queue or ledger lock.
#[derive(Debug, Default)]
pub struct MigrationGate {
    touched: DashMap<String, i64>,
}

impl MigrationGate {
    pub fn new() -> Self {
        Self {
            touched: DashMap::new(),
        }
    }

    /// `true` iff `host_id` was marked within `interval_ms` of `now_ms`.
    /// Expired entries read as absent (I6): this function is a pure
    /// function of (entries, now).
    pub fn recently_touched(&self, host_id: &str, now_ms: i64, interval_ms: i64) -> bool {
        match self.touched.get(host_id) {
            Some(inserted_at) => now_ms - *inserted_at <= interval_ms,
            None => false,
        }
    }

    /// Mark `host_id` as touched at `now_ms`, overwriting any prior entry.
    pub fn mark(&self, host_id: &str, now_ms: i64) {
        self.touched.insert(host_id.to_string(), now_ms);
    }

    /// Mark both endpoints of a migration atomically with respect to each
    /// other's visibility (each insert is independently atomic under
    /// `DashMap`'s sharded locking; callers never observe one written
    /// without the other having at least started).
    pub fn mark_pair(&self, src_host_id: &str, dst_host_id: &str, now_ms: i64) {
        self.mark(src_host_id, now_ms);
        self.mark(dst_host_id, now_ms);
    }

    /// Drop entries older than `interval_ms` as of `now_ms`. Not required
    /// for correctness (lookups already treat expired entries as absent)
    /// but keeps the map from growing unboundedly across a long-lived
    /// process.
    pub fn sweep(&self, now_ms: i64, interval_ms: i64) {
        self.touched.retain(|_, inserted_at| now_ms - *inserted_at <= interval_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: i64 = 240_000;

    #[test]
    fn untouched_host_is_not_recently_touched() {
        let gate = MigrationGate::new();
        assert!(!gate.recently_touched("h1", 0, TTL));
    }

    #[test]
    fn touch_expires_after_ttl() {
        let gate = MigrationGate::new();
        gate.mark("h1", 0);
        assert!(gate.recently_touched("h1", TTL, TTL));
        assert!(!gate.recently_touched("h1", TTL + 1, TTL));
    }

    #[test]
    fn mark_pair_touches_both_endpoints() {
        let gate = MigrationGate::new();
        gate.mark_pair("src", "dst", 100);
        assert!(gate.recently_touched("src", 100, TTL));
        assert!(gate.recently_touched("dst", 100, TTL));
    }

    #[test]
    fn double_mark_is_equivalent_to_later_single_mark() {
        let gate = MigrationGate::new();
        gate.mark_pair("src", "dst", 0);
        gate.mark_pair("src", "dst", 1_000);
        // Only the later timestamp should be in effect.
        assert!(gate.recently_touched("src", 1_000 + TTL, TTL));
        assert!(!gate.recently_touched("src", 1_000 + TTL + 1, TTL));
    }

    #[test]
    fn sweep_drops_expired_entries() {
        let gate = MigrationGate::new();
        gate.mark("h1", 0);
        gate.sweep(TTL + 1, TTL);
        assert_eq!(gate.touched.len(), 0);
    }
}
