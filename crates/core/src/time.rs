//! Timestamps for answers and quiz results.

use chrono::{DateTime, TimeDelta, Utc};

/// Source of `answered_at`, `started_at` and `completed_at`.
///
/// Running quizzes read the system time. A frozen clock stamps every answer
/// with the same instant, which keeps result snapshots comparable in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    frozen_at: Option<DateTime<Utc>>,
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self { frozen_at: None }
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self {
            frozen_at: Some(at),
        }
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.frozen_at.unwrap_or_else(Utc::now)
    }
}

/// 2023-11-14T22:13:20Z, the instant frozen clocks use in tests.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + TimeDelta::seconds(1_700_000_000)
}
