//! Home page summary

use axum::{extract::State, Extension, Json};
use chrono::Utc;

use crate::error::Result;
use crate::models::{HomeResponse, HomeStats};
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

const OWNED_DECKS_LIMIT: i64 = 12;
const DUE_REVIEWS_LIMIT: i64 = 20;
const RECENT_DECKS_LIMIT: i64 = 6;

/// GET /api/home
pub async fn summary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<HomeResponse>> {
    let user_id = auth.user_id;

    let (owned, continue_learning, recent, cards_reviewed, decks_created) = tokio::try_join!(
        state.db.list_owned_decks(user_id, OWNED_DECKS_LIMIT),
        state.db.get_due_reviews(user_id, Utc::now(), DUE_REVIEWS_LIMIT),
        state.db.list_recent_decks(user_id, RECENT_DECKS_LIMIT),
        state.db.count_reviewed_cards(user_id),
        state.db.count_owned_decks(user_id),
    )?;

    Ok(Json(HomeResponse {
        owned,
        continue_learning,
        recent,
        stats: HomeStats {
            cards_reviewed,
            decks_created,
        },
    }))
}
