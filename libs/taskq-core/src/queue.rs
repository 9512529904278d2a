//! Priority-keyed FIFO queue of queued tasks (C5).
//!
//! Buckets are kept in a `BTreeMap<priority, VecDeque<QueuedItem>>` and
//! walked highest-priority-first; within a bucket, order is FIFO except for
//! explicit head inserts. All mutation happens under a single
//! `parking_lot::Mutex`; the lock order discipline is "queue -> ledger", so
//! callers that need both take the queue lock first via
//! [`PriorityQueue::lock`] and then touch the ledger inside the critical
//! section.

use crate::stopflag::StopFlag;
use crate::types::{QueuedItem, TaskHandle};
use parking_lot::{Mutex, MutexGuard};
use std::collections::{BTreeMap, VecDeque};

type Buckets = BTreeMap<i64, VecDeque<QueuedItem>>;

/// What a visitor passed to [`QueueSession::iterate`] wants to happen next.
pub enum IterAction {
    /// Keep the current item, move to the next one.
    Continue,
    /// Remove the current item, then continue from the item that shifted
    /// into its place.
    RemoveCurrent,
    /// Stop iterating immediately, keeping the current item.
    Stop,
}

/// Concurrent priority FIFO. Cheap convenience methods (`enqueue`, `remove`,
/// `size_at`) each take the lock for a single operation; [`PriorityQueue::lock`]
/// and [`PriorityQueue::try_lock`] let a caller span several operations (and,
/// per the global lock order, ledger operations) under one critical section.
pub struct PriorityQueue {
    buckets: Mutex<Buckets>,
}

impl Default for PriorityQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self {
            buckets: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn enqueue(
        &self,
        priority: i64,
        handle: TaskHandle,
        can_ignore_quiesce: bool,
        enqueued_at_ms: i64,
        at_head: bool,
    ) -> bool {
        let mut g = self.buckets.lock();
        enqueue_locked(&mut g, priority, handle, can_ignore_quiesce, enqueued_at_ms, at_head)
    }

    pub fn remove(&self, priority: i64, handle: &TaskHandle) -> bool {
        let mut g = self.buckets.lock();
        remove_locked(&mut g, priority, |item| &item.handle == handle)
    }

    /// Remove the first item in `priority` matching a caller-supplied
    /// predicate, e.g. "any task belonging to job X" rather than an exact
    /// handle match.
    pub fn remove_matching(
        &self,
        priority: i64,
        predicate: impl Fn(&QueuedItem) -> bool,
    ) -> bool {
        let mut g = self.buckets.lock();
        remove_locked(&mut g, priority, predicate)
    }

    pub fn size_at(&self, priority: i64) -> usize {
        let g = self.buckets.lock();
        g.get(&priority).map(VecDeque::len).unwrap_or(0)
    }

    /// Acquire the queue mutex for a multi-operation critical section.
    pub fn lock(&self) -> QueueSession<'_> {
        QueueSession {
            guard: self.buckets.lock(),
        }
    }

    /// Non-blocking variant of [`PriorityQueue::lock`].
    pub fn try_lock(&self) -> Option<QueueSession<'_>> {
        self.buckets.try_lock().map(|guard| QueueSession { guard })
    }
}

fn enqueue_locked(
    buckets: &mut Buckets,
    priority: i64,
    handle: TaskHandle,
    can_ignore_quiesce: bool,
    enqueued_at_ms: i64,
    at_head: bool,
) -> bool {
    let bucket = buckets.entry(priority).or_default();
    let item = QueuedItem::new(handle, can_ignore_quiesce, enqueued_at_ms);
    if at_head {
        bucket.push_front(item);
    } else {
        bucket.push_back(item);
    }
    true
}

fn remove_locked(buckets: &mut Buckets, priority: i64, predicate: impl Fn(&QueuedItem) -> bool) -> bool {
    let Some(bucket) = buckets.get_mut(&priority) else {
        return false;
    };
    let Some(pos) = bucket.iter().position(predicate) else {
        return false;
    };
    bucket.remove(pos);
    if bucket.is_empty() {
        buckets.remove(&priority);
    }
    true
}

/// A held queue lock spanning one or more operations.
pub struct QueueSession<'q> {
    guard: MutexGuard<'q, Buckets>,
}

impl<'q> QueueSession<'q> {
    pub fn enqueue(
        &mut self,
        priority: i64,
        handle: TaskHandle,
        can_ignore_quiesce: bool,
        enqueued_at_ms: i64,
        at_head: bool,
    ) -> bool {
        enqueue_locked(&mut self.guard, priority, handle, can_ignore_quiesce, enqueued_at_ms, at_head)
    }

    pub fn remove(&mut self, priority: i64, handle: &TaskHandle) -> bool {
        remove_locked(&mut self.guard, priority, |item| &item.handle == handle)
    }

    pub fn size_at(&self, priority: i64) -> usize {
        self.guard.get(&priority).map(VecDeque::len).unwrap_or(0)
    }

    /// Walk priorities highest-to-lowest, items within a priority in order,
    /// calling `visitor` for each. The queue mutex stays held for the whole
    /// walk. `visitor` may ask for the current item to be removed; the
    /// caller MUST check [`StopFlag`] between items itself by returning
    /// [`IterAction::Stop`] once it observes `stop.get()` -- this method
    /// checks it for you before every visit so a pending job-stop can
    /// acquire the lock promptly.
    pub fn iterate(&mut self, stop: &StopFlag, mut visitor: impl FnMut(&QueuedItem) -> IterAction) {
        let priorities: Vec<i64> = self.guard.keys().rev().copied().collect();
        for priority in priorities {
            let mut index = 0;
            loop {
                if stop.get() {
                    return;
                }
                let item = match self.guard.get(&priority).and_then(|b| b.get(index)) {
                    Some(item) => item.clone(),
                    None => break,
                };
                match visitor(&item) {
                    IterAction::Continue => index += 1,
                    IterAction::RemoveCurrent => {
                        if let Some(bucket) = self.guard.get_mut(&priority) {
                            bucket.remove(index);
                            if bucket.is_empty() {
                                self.guard.remove(&priority);
                            }
                        }
                    }
                    IterAction::Stop => return,
                }
            }
        }
    }

    /// Release the lock early. Equivalent to dropping the session, spelled
    /// out to match the named `unlock` operation in the external interface.
    pub fn unlock(self) {}
}
