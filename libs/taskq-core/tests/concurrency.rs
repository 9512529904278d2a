//! Multi-thread fan-out tests exercising the queue's invariants under real
//! contention, not just sequential calls.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use taskq_core::{IterAction, PriorityQueue, StopFlag, TaskHandle};

#[test]
fn concurrent_enqueue_preserves_every_handle_exactly_once() {
    let queue = Arc::new(PriorityQueue::new());
    let producers = 8;
    let per_producer = 200;

    let mut handles = Vec::new();
    for p in 0..producers {
        let queue = queue.clone();
        handles.push(thread::spawn(move || {
            for i in 0..per_producer {
                queue.enqueue(5, TaskHandle::new(format!("job-{p}"), i), false, 0, false);
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    let stop = StopFlag::new();
    let mut seen = HashSet::new();
    queue.lock().iterate(&stop, |item| {
        assert!(seen.insert(item.handle.clone()), "duplicate handle observed: {}", item.handle);
        IterAction::Continue
    });
    assert_eq!(seen.len(), producers * per_producer as usize);
}

#[test]
fn concurrent_enqueue_and_remove_leave_a_consistent_final_size() {
    let queue = Arc::new(PriorityQueue::new());
    let total = 500u32;
    // Pre-seed the even handles; removers race to pull them back out while
    // producers concurrently push the odd handles in.
    for i in (0..total).step_by(2) {
        queue.enqueue(1, TaskHandle::new("job", i), false, 0, false);
    }

    let mut handles = Vec::new();
    for i in (0..total).step_by(2) {
        let queue = queue.clone();
        handles.push(thread::spawn(move || {
            assert!(queue.remove(1, &TaskHandle::new("job", i)));
        }));
    }
    for i in (1..total).step_by(2) {
        let queue = queue.clone();
        handles.push(thread::spawn(move || {
            queue.enqueue(1, TaskHandle::new("job", i), false, 0, false);
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(queue.size_at(1), (total / 2) as usize);
}
