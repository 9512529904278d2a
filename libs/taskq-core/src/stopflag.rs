//! Job-stop signal (C7): a lock-free hint checked between queue-iteration
//! steps so a pending stop can acquire the queue mutex promptly.

use std::sync::atomic::{AtomicBool, Ordering};

/// Single atomic boolean with load/store semantics. Not a barrier: readers
/// and writers only agree on atomicity, never on ordering relative to other
/// memory.
#[derive(Debug, Default)]
pub struct StopFlag {
    flag: AtomicBool,
}

impl StopFlag {
    pub fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    pub fn set(&self, value: bool) {
        self.flag.store(value, Ordering::SeqCst);
    }

    pub fn get(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
