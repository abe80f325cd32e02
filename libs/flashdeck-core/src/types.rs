//! Core types for review scheduling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::scheduler::sm2::INITIAL_EASE_FACTOR;

/// Self-reported recall difficulty for a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Hard,
}

impl Difficulty {
    /// Wire label for this difficulty.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "hard" => Ok(Self::Hard),
            _ => Err(CoreError::InvalidDifficulty(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduling state of one card for one user.
///
/// `interval` is in whole days; 0 means the card was never reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    pub interval: u32,
    pub ease_factor: f64,
    pub repetitions: u32,
}

impl ReviewState {
    /// State of a card that has no review record yet.
    ///
    /// Every caller resolving "no previous review" must go through this.
    pub const fn initial() -> Self {
        Self {
            interval: 0,
            ease_factor: INITIAL_EASE_FACTOR,
            repetitions: 0,
        }
    }

    /// Apply one review and return the following state.
    pub fn next(&self, difficulty: Difficulty) -> Self {
        crate::scheduler::compute_next_review(
            difficulty,
            self.interval,
            self.ease_factor,
            self.repetitions,
        )
    }
}

impl Default for ReviewState {
    fn default() -> Self {
        Self::initial()
    }
}
