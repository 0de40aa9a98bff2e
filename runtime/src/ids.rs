//! Time-derived identifiers for in-memory records.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Generates ids from the wall clock in milliseconds.
///
/// Two calls within the same millisecond would collide if the raw timestamp
/// were used, so each id is `max(now_millis, previous + 1)`. Ids from one
/// generator are strictly increasing even if the clock stalls or steps back.
#[derive(Debug, Default)]
pub struct TimeOrderedIds {
    last: AtomicI64,
}

impl TimeOrderedIds {
    /// Create a generator with no history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// Next id for an item created at `now`.
    pub fn next(&self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        let mut last = self.last.load(Ordering::Acquire);
        loop {
            let next = candidate.max(last.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }

    /// The most recently issued id, or 0.
    #[must_use]
    pub fn last(&self) -> i64 {
        self.last.load(Ordering::Acquire)
    }
}
