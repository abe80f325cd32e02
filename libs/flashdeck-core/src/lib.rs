//! Core flashcard library shared by the backend and its clients.
//!
//! Provides:
//! - The SM-2 style review scheduler (pure, no I/O)
//! - Shared review types (Difficulty, ReviewState, ScheduledReview)

pub mod error;
pub mod scheduler;
pub mod types;

pub use error::{CoreError, Result};
pub use scheduler::{compute_next_review, due_at, schedule, ScheduledReview};
pub use types::{Difficulty, ReviewState};
