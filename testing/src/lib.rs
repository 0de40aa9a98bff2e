//! # Micro Frontend Testing
//!
//! Testing utilities shared by the workspace crates.
//!
//! This crate provides:
//! - Deterministic [`Clock`] implementations
//! - [`InMemoryRepository`], a `Vec`-backed implementation of every storage
//!   trait, for handler and client tests that should not touch SQLite
//!
//! ## Example
//!
//! ```
//! use mfe_core::repository::TodoRepository;
//! use mfe_core::types::NewTodo;
//! use mfe_testing::InMemoryRepository;
//!
//! # tokio_test::block_on(async {
//! let repo = InMemoryRepository::new();
//! let todo = repo.create_todo(NewTodo::new("buy milk")).await.unwrap();
//! assert_eq!(todo.id, 1);
//! assert!(!todo.completed);
//! # });
//! ```

use chrono::{DateTime, Utc};
use mfe_core::environment::Clock;

pub mod memory;

/// Deterministic clocks
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Clock frozen at one instant.
    ///
    /// # Example
    ///
    /// ```
    /// use mfe_testing::mocks::FixedClock;
    /// use mfe_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2);
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Clock that always reads `time`
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by one millisecond on every read.
    ///
    /// Gives rows created in a tight loop distinct, ordered timestamps.
    #[derive(Debug)]
    pub struct StepClock {
        start: DateTime<Utc>,
        ticks: AtomicI64,
    }

    impl StepClock {
        /// Clock whose first reading is `start`.
        #[must_use]
        pub const fn new(start: DateTime<Utc>) -> Self {
            Self {
                start,
                ticks: AtomicI64::new(0),
            }
        }
    }

    impl Clock for StepClock {
        fn now(&self) -> DateTime<Utc> {
            let ticks = self.ticks.fetch_add(1, Ordering::Relaxed);
            self.start + chrono::Duration::milliseconds(ticks)
        }
    }

    /// Fixed clock at 2025-01-01 00:00:00 UTC
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(epoch())
    }

    /// Create a stepping clock starting at 2025-01-01 00:00:00 UTC
    #[must_use]
    pub fn step_clock() -> StepClock {
        StepClock::new(epoch())
    }

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default()
    }
}

pub use memory::InMemoryRepository;
pub use mocks::{FixedClock, StepClock, step_clock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(time1.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn step_clock_advances() {
        let clock = step_clock();
        let first = clock.now();
        let second = clock.now();
        assert_eq!((second - first).num_milliseconds(), 1);
    }
}
