//! SM-2 style scheduler with a two-level difficulty signal.
//!
//! An easy review walks the classic 1 day, 6 days, then `interval * ease`
//! ladder and nudges the ease factor up. A hard review sends the card back
//! to a one day interval and lowers the ease factor, never below
//! [`MINIMUM_EASE_FACTOR`].

use crate::types::{Difficulty, ReviewState};

pub const INITIAL_EASE_FACTOR: f64 = 2.5;
pub const MINIMUM_EASE_FACTOR: f64 = 1.3;
pub const EASY_EASE_BONUS: f64 = 0.1;
pub const HARD_EASE_PENALTY: f64 = 0.2;
pub const FIRST_INTERVAL_DAYS: u32 = 1;
pub const SECOND_INTERVAL_DAYS: u32 = 6;

/// Compute the state that follows one review.
///
/// Total over its inputs: any `current_ease_factor` (NaN and values under
/// the floor included) yields `ease_factor >= 1.3` and `interval >= 1`.
/// Growth intervals use `f64::round`, so ties round away from zero.
pub fn compute_next_review(
    difficulty: Difficulty,
    current_interval: u32,
    current_ease_factor: f64,
    current_repetitions: u32,
) -> ReviewState {
    match difficulty {
        Difficulty::Easy => {
            let repetitions = current_repetitions.saturating_add(1);
            let interval = match repetitions {
                1 => FIRST_INTERVAL_DAYS,
                2 => SECOND_INTERVAL_DAYS,
                _ => grown_interval(current_interval, current_ease_factor),
            };
            ReviewState {
                interval,
                ease_factor: floor_ease(current_ease_factor + EASY_EASE_BONUS),
                repetitions,
            }
        }
        Difficulty::Hard => ReviewState {
            interval: FIRST_INTERVAL_DAYS,
            ease_factor: floor_ease(current_ease_factor - HARD_EASE_PENALTY),
            repetitions: 0,
        },
    }
}

fn grown_interval(current_interval: u32, ease_factor: f64) -> u32 {
    // f64::max drops NaN; the cast saturates at u32::MAX.
    (f64::from(current_interval) * ease_factor)
        .round()
        .max(f64::from(FIRST_INTERVAL_DAYS)) as u32
}

fn floor_ease(ease_factor: f64) -> f64 {
    ease_factor.max(MINIMUM_EASE_FACTOR)
}
