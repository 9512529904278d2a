//! Shared data model: task handles, queue entries, and the read-only
//! snapshots supplied by external collaborators.

use serde::{Deserialize, Serialize};

/// Opaque identity of a job submitted to the scheduler.
pub type JobId = String;

/// Index of a task within a job.
pub type TaskIndex = u32;

/// Identity pair for a single queued task. Equality is by both fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskHandle {
    pub job_id: JobId,
    pub task_index: TaskIndex,
}

impl TaskHandle {
    pub fn new(job_id: impl Into<JobId>, task_index: TaskIndex) -> Self {
        Self {
            job_id: job_id.into(),
            task_index,
        }
    }
}

impl std::fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.job_id, self.task_index)
    }
}

/// An item sitting in a priority bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedItem {
    pub handle: TaskHandle,
    pub can_ignore_quiesce: bool,
    pub enqueued_at_ms: i64,
}

impl QueuedItem {
    pub fn new(handle: TaskHandle, can_ignore_quiesce: bool, enqueued_at_ms: i64) -> Self {
        Self {
            handle,
            can_ignore_quiesce,
            enqueued_at_ms,
        }
    }

    /// How long this item has been sitting in the queue, given `now_ms`.
    pub fn time_on_queue_ms(&self, now_ms: i64) -> i64 {
        (now_ms - self.enqueued_at_ms).max(0)
    }
}

/// Read-only snapshot of a host, supplied by the (out-of-scope) store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostState {
    pub host_id: Option<String>,
    pub available_slots: i64,
    pub max_slots: i64,
    pub mean_active_tasks: f64,
    pub up: bool,
}

/// Summary of a queued task, supplied for migration decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    pub handle: TaskHandle,
    pub byte_count: i64,
    pub current_host_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_equality_is_by_both_fields() {
        let a = TaskHandle::new("job-1", 0);
        let b = TaskHandle::new("job-1", 0);
        let c = TaskHandle::new("job-1", 1);
        let d = TaskHandle::new("job-2", 0);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn time_on_queue_never_negative() {
        let item = QueuedItem::new(TaskHandle::new("j", 0), false, 1_000);
        assert_eq!(item.time_on_queue_ms(500), 0);
        assert_eq!(item.time_on_queue_ms(1_500), 500);
    }
}
