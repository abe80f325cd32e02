//! Review scheduling.
//!
//! The state transition lives in [`sm2`] and never touches the clock.
//! Callers turn the new interval into a due date with [`due_at`], once,
//! using their own time source.

pub mod sm2;

pub use sm2::compute_next_review;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Difficulty, ReviewState};

/// Result of scheduling a card after review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledReview {
    pub state: ReviewState,
    pub due_at: DateTime<Utc>,
}

/// Due date for a card reviewed at `now` with the given interval.
///
/// Saturates at the latest representable timestamp.
pub fn due_at(now: DateTime<Utc>, interval: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(interval)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Apply one review to `state` and derive the due date from `now`.
pub fn schedule(state: &ReviewState, difficulty: Difficulty, now: DateTime<Utc>) -> ScheduledReview {
    let state = state.next(difficulty);
    ScheduledReview {
        due_at: due_at(now, state.interval),
        state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 14, 30, 0).unwrap()
    }

    #[test]
    fn due_at_adds_whole_days() {
        assert_eq!(due_at(now(), 1), Utc.with_ymd_and_hms(2024, 3, 11, 14, 30, 0).unwrap());
        assert_eq!(due_at(now(), 6), Utc.with_ymd_and_hms(2024, 3, 16, 14, 30, 0).unwrap());
        assert_eq!(due_at(now(), 0), now());
    }

    #[test]
    fn due_at_saturates_instead_of_overflowing() {
        assert_eq!(due_at(now(), u32::MAX), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn schedule_uses_post_review_interval() {
        let state = ReviewState {
            interval: 6,
            ease_factor: 2.7,
            repetitions: 2,
        };
        let result = schedule(&state, Difficulty::Easy, now());
        assert_eq!(result.state.interval, 16);
        assert_eq!(result.due_at, now() + Duration::days(16));
    }

    #[test]
    fn first_review_is_due_tomorrow() {
        let result = schedule(&ReviewState::initial(), Difficulty::Easy, now());
        assert_eq!(result.state.interval, 1);
        assert_eq!(result.state.repetitions, 1);
        assert_eq!(result.due_at, now() + Duration::days(1));
    }

    #[test]
    fn hard_review_is_due_tomorrow_regardless_of_interval() {
        let state = ReviewState {
            interval: 120,
            ease_factor: 2.9,
            repetitions: 7,
        };
        let result = schedule(&state, Difficulty::Hard, now());
        assert_eq!(result.due_at, now() + Duration::days(1));
        assert_eq!(result.state.repetitions, 0);
    }

    #[test]
    fn schedule_is_deterministic() {
        let state = ReviewState {
            interval: 15,
            ease_factor: 2.3,
            repetitions: 4,
        };
        assert_eq!(
            schedule(&state, Difficulty::Easy, now()),
            schedule(&state, Difficulty::Easy, now())
        );
    }
}
