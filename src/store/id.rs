use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Record identifier generator.
///
/// Ids are seeded from the wall clock in milliseconds so they read like
/// creation timestamps, but each value is `max(now_ms, last + 1)`. Two calls
/// inside the same millisecond therefore never collide, and ids keep
/// increasing for the lifetime of the process, even across deletes.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    pub fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            // The closure always returns Some, so this branch is unreachable.
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }

    /// Last id handed out, or 0 if none yet.
    pub fn last(&self) -> i64 {
        self.last.load(Ordering::SeqCst)
    }
}
