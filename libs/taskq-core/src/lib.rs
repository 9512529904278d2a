//! `taskq-core`: the concurrent, priority-ordered task-dispatch queue at the
//! center of a distributed job scheduler, plus its host-slot ledger and
//! migration gate.
//!
//! This crate is a library with no wire protocol or CLI of its own (see
//! `SPEC_FULL.md` §6). It owns:
//!
//! - [`PriorityQueue`] (C5): the priority-bucketed FIFO of queued tasks.
//! - [`HostSlotLedger`] (C2): the effective free-slot count per host.
//! - [`MigrationGate`] (C3): rate-limiting for task migration.
//! - [`HostRanker`] (C4), reachable through [`DispatchPolicy`]/[`DispatchCore`].
//! - [`DispatchPolicy`] (C6): the admission decisions built on the above.
//! - [`StopFlag`] (C7): a cooperative iteration-abort hint.
//!
//! [`DispatchCore`] is a facade wiring C2-C7 together behind a single
//! operation surface, for callers that want one object rather than
//! assembling the pieces themselves.

pub mod clock;
pub mod config;
pub mod error;
pub mod gate;
pub mod ledger;
pub mod policy;
pub mod queue;
pub mod ranker;
pub mod stopflag;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::DispatchConfig;
pub use error::{Result, TaskQError};
pub use gate::MigrationGate;
pub use ledger::HostSlotLedger;
pub use policy::DispatchPolicy;
pub use queue::{IterAction, PriorityQueue, QueueSession};
pub use ranker::HostRanker;
pub use stopflag::StopFlag;
pub use types::{HostState, JobId, QueuedItem, TaskHandle, TaskIndex, TaskSummary};

use std::sync::Arc;

/// Facade combining the queue, ledger, gate, and stop flag behind one
/// operation surface. Holding one `DispatchCore` per scheduler process is
/// the expected usage; it owns no process-wide singleton state.
pub struct DispatchCore {
    queue: PriorityQueue,
    ledger: HostSlotLedger,
    gate: MigrationGate,
    stop_flag: StopFlag,
    clock: Arc<dyn Clock>,
    config: DispatchConfig,
}

impl DispatchCore {
    /// Construct a new core from validated tunables and a clock
    /// implementation (production code should pass [`SystemClock`]).
    pub fn new(config: DispatchConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            queue: PriorityQueue::new(),
            ledger: HostSlotLedger::new(),
            gate: MigrationGate::new(),
            stop_flag: StopFlag::new(),
            clock,
            config,
        })
    }

    /// Current monotonic millisecond reading from the core's clock.
    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    // -- Queue operations (C5) ------------------------------------------------

    pub fn enqueue(&self, priority: i64, handle: TaskHandle, can_ignore_quiesce: bool, at_head: bool) -> bool {
        self.queue.enqueue(priority, handle, can_ignore_quiesce, self.now_ms(), at_head)
    }

    pub fn remove(&self, priority: i64, handle: &TaskHandle) -> bool {
        self.queue.remove(priority, handle)
    }

    pub fn size_at(&self, priority: i64) -> usize {
        self.queue.size_at(priority)
    }

    pub fn lock(&self) -> QueueSession<'_> {
        self.queue.lock()
    }

    pub fn try_lock(&self) -> Option<QueueSession<'_>> {
        self.queue.try_lock()
    }

    /// Walk the queue under its lock, calling `visitor` for each item
    /// highest-priority-first; aborts early if [`DispatchCore::stop_flag`]
    /// becomes set.
    pub fn iterate(&self, visitor: impl FnMut(&QueuedItem) -> IterAction) {
        self.queue.lock().iterate(&self.stop_flag, visitor);
    }

    // -- Dispatch policy (C6), delegating to a borrowed DispatchPolicy -------

    pub fn pick_host<'h>(&self, candidates: &'h [HostState], require_free_slot: bool) -> Option<&'h HostState> {
        self.policy().pick_host(candidates, require_free_slot)
    }

    pub fn may_kick_new_task_on(&self, host: &HostState, time_on_queue_ms: i64) -> bool {
        self.policy().may_kick_new_task_on(host, time_on_queue_ms)
    }

    pub fn may_migrate(&self, task: Option<&TaskSummary>, target_host_id: Option<&str>, now_ms: i64) -> bool {
        self.policy().may_migrate(task, target_host_id, now_ms)
    }

    pub fn size_age_admits(&self, byte_count: i64, time_on_queue_ms: i64) -> bool {
        self.policy().size_age_admits(byte_count, time_on_queue_ms)
    }

    pub fn mark_pair_migrated(&self, src_host_id: &str, dst_host_id: &str, now_ms: i64) {
        self.gate.mark_pair(src_host_id, dst_host_id, now_ms);
    }

    fn policy(&self) -> DispatchPolicy<'_> {
        DispatchPolicy::new(&self.ledger, &self.gate, &self.config)
    }

    // -- Ledger operations (C2) ----------------------------------------------

    pub fn mark_host_available(&self, host_id: &str) {
        self.ledger.mark_available(host_id);
    }

    pub fn mark_host_kicked(&self, host_id: &str) {
        self.ledger.mark_kicked(host_id);
    }

    pub fn refresh_ledger(&self, hosts: &[HostState], now_ms: i64) {
        self.ledger.refresh_from(hosts, now_ms, self.config.avail_refresh_ms);
    }

    // -- Stop flag (C7) -------------------------------------------------------

    pub fn set_stop_flag(&self, value: bool) {
        self.stop_flag.set(value);
    }

    pub fn get_stop_flag(&self) -> bool {
        self.stop_flag.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core() -> DispatchCore {
        DispatchCore::new(DispatchConfig::default(), Arc::new(FixedClock::new(0))).unwrap()
    }

    #[test]
    fn constructor_rejects_invalid_config() {
        let mut cfg = DispatchConfig::default();
        cfg.migration_max_bytes = cfg.migration_min_bytes - 1;
        let err = DispatchCore::new(cfg, Arc::new(FixedClock::new(0)));
        assert!(err.is_err());
    }

    #[test]
    fn stop_flag_round_trips_through_facade() {
        let core = core();
        assert!(!core.get_stop_flag());
        core.set_stop_flag(true);
        assert!(core.get_stop_flag());
    }

    #[test]
    fn end_to_end_single_slot_host_scenario() {
        let core = core();
        core.mark_host_available("A");
        let a = HostState {
            host_id: Some("A".to_string()),
            available_slots: 1,
            max_slots: 1,
            mean_active_tasks: 0.0,
            up: true,
        };
        assert_eq!(core.pick_host(&[a.clone()], true).unwrap().host_id.as_deref(), Some("A"));
        assert!(core.may_kick_new_task_on(&a, 0));
    }

    #[test]
    fn queue_and_policy_share_lock_order_without_deadlock() {
        let core = core();
        core.mark_host_available("A");
        core.enqueue(5, TaskHandle::new("job", 0), false, false);

        // Queue lock held, ledger touched inside: queue -> ledger order.
        let mut session = core.lock();
        session.iterate(&core.stop_flag, |_item| {
            core.mark_host_kicked("A");
            IterAction::Continue
        });
        drop(session);

        assert_eq!(core.ledger.snapshot("A"), 0);
    }
}
