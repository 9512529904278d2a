//! Stand-ins for two out-of-scope collaborators: the `HostState` store and
//! the task-kick transport. Real deployments replace both; this demo only
//! needs something that behaves like them.

use taskq_core::HostState;

/// A fixed fleet of hosts, as if freshly reported by the (absent) store.
pub fn demo_fleet() -> Vec<HostState> {
    vec![
        HostState {
            host_id: Some("host-a".to_string()),
            available_slots: 1,
            max_slots: 1,
            mean_active_tasks: 0.4,
            up: true,
        },
        HostState {
            host_id: Some("host-b".to_string()),
            available_slots: 3,
            max_slots: 4,
            mean_active_tasks: 1.2,
            up: true,
        },
        HostState {
            host_id: Some("host-c".to_string()),
            available_slots: 2,
            max_slots: 4,
            mean_active_tasks: 0.1,
            up: true,
        },
    ]
}

/// Emit a task-kick command to a host. Real deployments hand this to a
/// transport; the demo just logs it.
pub fn kick(host_id: &str, task: &taskq_core::TaskHandle) {
    tracing::info!(host_id, %task, "kick");
}
