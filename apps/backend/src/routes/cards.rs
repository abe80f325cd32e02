//! Card endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use flashdeck_core::{CoreError, Difficulty};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::routes::decks::is_blank;
use crate::services::review::submit_review;
use crate::AppState;

/// PATCH /api/cards/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(card_id): Path<Uuid>,
    Json(payload): Json<UpdateCardRequest>,
) -> Result<Json<Card>> {
    if payload.front.is_none() && payload.back.is_none() {
        return Err(ApiError::BadRequest("nothing to update".to_string()));
    }
    if [&payload.front, &payload.back]
        .into_iter()
        .flatten()
        .any(|text| is_blank(text))
    {
        return Err(ApiError::BadRequest("front and back cannot be empty".to_string()));
    }

    ensure_card_owner(&state, card_id, auth.user_id).await?;

    let card = state
        .db
        .update_card(card_id, payload.front.as_deref(), payload.back.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    Ok(Json(card))
}

/// DELETE /api/cards/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(card_id): Path<Uuid>,
) -> Result<Json<DeleteCardResponse>> {
    ensure_card_owner(&state, card_id, auth.user_id).await?;

    if !state.db.delete_card(card_id).await? {
        return Err(ApiError::NotFound("Card not found".to_string()));
    }

    tracing::info!(%card_id, "Deleted card");

    Ok(Json(DeleteCardResponse { success: true }))
}

/// POST /api/cards/:id/review
/// Records a review and returns the new scheduling state
pub async fn review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(card_id): Path<Uuid>,
    Json(payload): Json<SubmitReviewRequest>,
) -> Result<Json<ReviewResponse>> {
    let difficulty = parse_difficulty(payload.difficulty.as_ref())?;

    let row = submit_review(
        &*state.db,
        auth.user_id,
        card_id,
        difficulty,
        Utc::now(),
        state.config.review_max_attempts,
    )
    .await?;

    Ok(Json(row.to_response()))
}

fn parse_difficulty(raw: Option<&serde_json::Value>) -> Result<Difficulty> {
    match raw {
        Some(serde_json::Value::String(label)) => Ok(label.parse()?),
        Some(other) => Err(CoreError::InvalidDifficulty(other.to_string()).into()),
        None => Err(ApiError::InvalidDifficulty(
            "difficulty is required, one of \"easy\", \"hard\"".to_string(),
        )),
    }
}

async fn ensure_card_owner(state: &AppState, card_id: Uuid, user_id: Uuid) -> Result<()> {
    let card = state
        .db
        .get_card(card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;
    let deck = state
        .db
        .get_deck(card.deck_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))?;

    if !deck.is_owned_by(user_id) {
        return Err(ApiError::Forbidden("only the deck owner can change cards".to_string()));
    }
    Ok(())
}
