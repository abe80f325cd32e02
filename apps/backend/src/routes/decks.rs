//! Deck endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/decks
/// Public decks, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthenticatedUser>,
) -> Result<Json<DeckListResponse>> {
    let decks = state.db.list_public_decks().await?;
    Ok(Json(DeckListResponse { decks }))
}

/// POST /api/decks
/// Creates a deck and its cards as one unit
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateDeckRequest>,
) -> Result<(StatusCode, Json<CreateDeckResponse>)> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }
    if let Some(index) = payload.cards.iter().position(|c| is_blank(&c.front) || is_blank(&c.back)) {
        return Err(ApiError::BadRequest(format!(
            "card {index} needs both front and back"
        )));
    }

    let description = payload.description.as_deref().unwrap_or("").trim();
    let deck = state
        .db
        .create_deck_with_cards(auth.user_id, title, description, payload.is_public, &payload.cards)
        .await?;

    tracing::info!(
        deck_id = %deck.id,
        owner = %auth.user_id,
        cards = payload.cards.len(),
        "Created deck"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateDeckResponse {
            deck_id: deck.id,
            card_count: payload.cards.len(),
        }),
    ))
}

/// GET /api/decks/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<DeckWithCards>> {
    let deck = visible_deck(&state, deck_id, auth.user_id).await?;
    let cards = state.db.get_deck_cards(deck_id).await?;
    Ok(Json(DeckWithCards { deck, cards }))
}

/// GET /api/decks/:id/review
/// Deck with the cards currently due for the caller
pub async fn review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<DeckWithCards>> {
    let deck = visible_deck(&state, deck_id, auth.user_id).await?;
    let cards = state
        .db
        .get_due_cards(deck_id, auth.user_id, Utc::now())
        .await?;
    Ok(Json(DeckWithCards { deck, cards }))
}

/// POST /api/decks/:id/cards
pub async fn add_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
    Json(payload): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<Card>)> {
    let (front, back) = match (payload.front.as_deref(), payload.back.as_deref()) {
        (Some(front), Some(back)) if !is_blank(front) && !is_blank(back) => (front, back),
        _ => return Err(ApiError::BadRequest("front and back are required".to_string())),
    };

    let deck = state
        .db
        .get_deck(deck_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))?;
    if !deck.is_owned_by(auth.user_id) {
        return Err(ApiError::Forbidden("only the deck owner can add cards".to_string()));
    }

    let card = state.db.add_card(deck_id, front, back).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// GET /api/decks/:id/cards/:card_id
pub async fn get_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path((deck_id, card_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CardWithDeckTitle>> {
    let deck = visible_deck(&state, deck_id, auth.user_id).await?;
    let card = state
        .db
        .get_card(card_id)
        .await?
        .filter(|c| c.deck_id == deck.id)
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    Ok(Json(CardWithDeckTitle {
        card,
        deck_title: deck.title,
    }))
}

async fn visible_deck(state: &AppState, deck_id: Uuid, user_id: Uuid) -> Result<Deck> {
    let deck = state
        .db
        .get_deck(deck_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))?;

    if !deck.is_visible_to(user_id) {
        return Err(ApiError::Forbidden("deck is private".to_string()));
    }
    Ok(deck)
}

pub(crate) fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
