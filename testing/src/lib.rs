//! # Ticketbook Testing
//!
//! Testing utilities for Ticketbook reducers.
//!
//! - [`FixedClock`] / [`test_clock`]: deterministic time
//! - [`ReducerTest`]: Given-When-Then harness over a sequence of actions
//! - [`assertions`]: effect assertions
//! - [`effects`]: resolving effect descriptions without a Store
//!
//! ## Example
//!
//! ```ignore
//! use ticketbook_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(CheckoutReducer::new())
//!     .with_env(test_env())
//!     .given_state(CheckoutState::new(listing))
//!     .when_action(CheckoutAction::DecrementQuantity { item_id })
//!     .then_state(|state| assert_eq!(state.total().cents(), 0))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use ticketbook_core::environment::Clock;

mod reducer_test;

pub use reducer_test::{ReducerTest, assertions, effects};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ticketbook_testing::mocks::FixedClock;
    /// use ticketbook_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
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

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }
}

pub use mocks::{FixedClock, test_clock};
