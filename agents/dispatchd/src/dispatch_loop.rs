//! The external dispatch loop: acquire the queue, walk priorities high to
//! low, and for each candidate task ask the core whether it may kick or
//! migrate.

use crate::feed;
use std::sync::Arc;
use taskq_core::{DispatchCore, HostState, IterAction};
use tracing::{debug, info};

/// Run one dispatch pass over the current queue contents.
///
/// Returns the number of tasks kicked.
pub fn run_once(core: &DispatchCore, fleet: &[HostState]) -> usize {
    let now = core.now_ms();
    let mut kicked = 0usize;

    core.iterate(|item| {
        if core.get_stop_flag() {
            return IterAction::Stop;
        }

        let time_on_queue_ms = item.time_on_queue_ms(now);
        let Some(best) = core.pick_host(fleet, true) else {
            debug!(task = %item.handle, "no eligible host with a free slot");
            return IterAction::Continue;
        };
        let Some(host_id) = best.host_id.as_deref() else {
            return IterAction::Continue;
        };

        if !core.may_kick_new_task_on(best, time_on_queue_ms) {
            debug!(task = %item.handle, host_id, "last-slot delay not yet elapsed");
            return IterAction::Continue;
        }

        core.mark_host_kicked(host_id);
        feed::kick(host_id, &item.handle);
        kicked += 1;
        IterAction::RemoveCurrent
    });

    info!(kicked, "dispatch pass complete");
    kicked
}

/// Periodically refresh the ledger from the (simulated) authoritative
/// fleet snapshot. Run synchronously, as a single pass per call, since the
/// core has no async dependency of its own.
pub fn refresh_from_fleet(core: &DispatchCore, fleet: &[HostState]) {
    core.refresh_ledger(fleet, core.now_ms());
}

pub fn shutdown(core: &Arc<DispatchCore>) {
    core.set_stop_flag(true);
}
