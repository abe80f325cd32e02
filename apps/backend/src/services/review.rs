//! Review submission: load, schedule, persist.
//!
//! Submissions for the same (card, user) are linearized with an optimistic
//! version check. A submission that loses the race re-reads the state and
//! schedules again from it; it never writes a result computed from a stale
//! state.

use chrono::{DateTime, Utc};
use flashdeck_core::{schedule, Difficulty, ReviewState, ScheduledReview};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::DbCardReview;

/// Persistence needed to submit a review.
#[allow(async_fn_in_trait)]
pub trait ReviewStore {
    async fn card_exists(&self, card_id: Uuid) -> Result<bool>;

    async fn load_review(&self, card_id: Uuid, user_id: Uuid) -> Result<Option<DbCardReview>>;

    /// Create the first state. `None` if a row appeared concurrently.
    async fn insert_review(
        &self,
        card_id: Uuid,
        user_id: Uuid,
        next: &ScheduledReview,
    ) -> Result<Option<DbCardReview>>;

    /// Replace the state at `expected_version`. `None` if it moved on.
    async fn update_review(
        &self,
        card_id: Uuid,
        user_id: Uuid,
        expected_version: i64,
        next: &ScheduledReview,
    ) -> Result<Option<DbCardReview>>;
}

impl ReviewStore for Database {
    async fn card_exists(&self, card_id: Uuid) -> Result<bool> {
        Ok(self.get_card(card_id).await?.is_some())
    }

    async fn load_review(&self, card_id: Uuid, user_id: Uuid) -> Result<Option<DbCardReview>> {
        self.get_card_review(card_id, user_id).await
    }

    async fn insert_review(
        &self,
        card_id: Uuid,
        user_id: Uuid,
        next: &ScheduledReview,
    ) -> Result<Option<DbCardReview>> {
        self.insert_card_review(card_id, user_id, next).await
    }

    async fn update_review(
        &self,
        card_id: Uuid,
        user_id: Uuid,
        expected_version: i64,
        next: &ScheduledReview,
    ) -> Result<Option<DbCardReview>> {
        self.update_card_review(card_id, user_id, expected_version, next)
            .await
    }
}

/// Record one review of `card_id` by `user_id` made at `now`.
///
/// Tries at most `max_attempts` times (at least once) before reporting
/// [`ApiError::ConcurrentUpdateConflict`].
pub async fn submit_review<S: ReviewStore>(
    store: &S,
    user_id: Uuid,
    card_id: Uuid,
    difficulty: Difficulty,
    now: DateTime<Utc>,
    max_attempts: u32,
) -> Result<DbCardReview> {
    if !store.card_exists(card_id).await? {
        return Err(ApiError::NotFound("Card not found".to_string()));
    }

    let max_attempts = max_attempts.max(1);
    for attempt in 1..=max_attempts {
        let previous = store.load_review(card_id, user_id).await?;
        let current = previous
            .as_ref()
            .map(DbCardReview::to_core_state)
            .unwrap_or_else(ReviewState::initial);

        let next = schedule(&current, difficulty, now);

        let saved = match &previous {
            Some(row) => {
                store
                    .update_review(card_id, user_id, row.version, &next)
                    .await?
            }
            None => store.insert_review(card_id, user_id, &next).await?,
        };

        if let Some(row) = saved {
            tracing::debug!(
                %card_id,
                %user_id,
                %difficulty,
                interval = row.interval_days,
                repetitions = row.repetitions,
                "review recorded"
            );
            return Ok(row);
        }

        tracing::warn!(
            %card_id,
            %user_id,
            attempt,
            max_attempts,
            "review state changed concurrently, recomputing"
        );
    }

    Err(ApiError::ConcurrentUpdateConflict(format!(
        "review of card {card_id} kept changing concurrently, retry the request"
    )))
}
