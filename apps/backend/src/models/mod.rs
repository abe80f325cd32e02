//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from flashdeck-core
pub use flashdeck_core::{Difficulty, ReviewState, ScheduledReview};

// === Database Entity Types ===

/// Registered user
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub token_hash: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Deck stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Deck {
    pub id: Uuid,
    pub owner: Uuid,
    pub title: String,
    pub description: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deck {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner == user_id
    }

    /// Public decks are readable by everyone, private ones by their owner.
    pub fn is_visible_to(&self, user_id: Uuid) -> bool {
        self.is_public || self.is_owned_by(user_id)
    }
}

/// Card stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Card {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
    pub position: i32,
    pub extra: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review state of one card for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DbCardReview {
    pub id: Uuid,
    pub card_id: Uuid,
    pub user_id: Uuid,
    pub interval_days: i64,
    pub ease_factor: f64,
    pub repetitions: i64,
    pub due_at: DateTime<Utc>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbCardReview {
    /// Convert to flashdeck-core ReviewState
    pub fn to_core_state(&self) -> ReviewState {
        ReviewState {
            interval: column_to_u32(self.interval_days),
            ease_factor: self.ease_factor,
            repetitions: column_to_u32(self.repetitions),
        }
    }

    /// Convert to API response
    pub fn to_response(&self) -> ReviewResponse {
        ReviewResponse {
            card_id: self.card_id,
            interval: column_to_u32(self.interval_days),
            ease_factor: self.ease_factor,
            repetitions: column_to_u32(self.repetitions),
            due_at: self.due_at,
        }
    }
}

// Columns carry CHECK (>= 0); clamp anyway rather than wrap.
fn column_to_u32(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

/// Due review joined with its card and deck, for the home page
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DueReview {
    pub card_id: Uuid,
    pub interval_days: i64,
    pub ease_factor: f64,
    pub repetitions: i64,
    pub due_at: DateTime<Utc>,
    pub front: String,
    pub back: String,
    pub deck_id: Uuid,
    pub deck_title: String,
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterUserResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserStatusResponse {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub last_seen_at: DateTime<Utc>,
}

// Deck types
#[derive(Debug, Serialize, Deserialize)]
pub struct DeckListResponse {
    pub decks: Vec<Deck>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCard {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDeckRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub cards: Vec<NewCard>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDeckResponse {
    pub deck_id: Uuid,
    pub card_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckWithCards {
    #[serde(flatten)]
    pub deck: Deck,
    pub cards: Vec<Card>,
}

// Card types
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCardRequest {
    pub front: Option<String>,
    pub back: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCardRequest {
    pub front: Option<String>,
    pub back: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CardWithDeckTitle {
    #[serde(flatten)]
    pub card: Card,
    pub deck_title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteCardResponse {
    pub success: bool,
}

// Review types
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SubmitReviewRequest {
    /// Left untyped so a missing or non-string label is reported as an
    /// invalid difficulty by the handler.
    #[serde(default)]
    pub difficulty: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub card_id: Uuid,
    pub interval: u32,
    pub ease_factor: f64,
    pub repetitions: u32,
    pub due_at: DateTime<Utc>,
}

// Home types
#[derive(Debug, Serialize, Deserialize)]
pub struct HomeResponse {
    pub owned: Vec<Deck>,
    pub continue_learning: Vec<DueReview>,
    pub recent: Vec<Deck>,
    pub stats: HomeStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HomeStats {
    pub cards_reviewed: i64,
    pub decks_created: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn review_row(interval_days: i64, repetitions: i64) -> DbCardReview {
        let now = Utc::now();
        DbCardReview {
            id: Uuid::new_v4(),
            card_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            interval_days,
            ease_factor: 2.6,
            repetitions,
            due_at: now,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn deck(owner: Uuid, is_public: bool) -> Deck {
        let now = Utc::now();
        Deck {
            id: Uuid::new_v4(),
            owner,
            title: "Rust".to_string(),
            description: String::new(),
            is_public,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn review_row_converts_to_core_state() {
        let row = review_row(6, 2);
        assert_eq!(
            row.to_core_state(),
            ReviewState {
                interval: 6,
                ease_factor: 2.6,
                repetitions: 2,
            }
        );
    }

    #[test]
    fn out_of_range_columns_are_clamped() {
        let state = review_row(-4, i64::MAX).to_core_state();
        assert_eq!(state.interval, 0);
        assert_eq!(state.repetitions, u32::MAX);
    }

    #[test]
    fn review_response_carries_row_fields() {
        let row = review_row(16, 3);
        let response = row.to_response();
        assert_eq!(response.card_id, row.card_id);
        assert_eq!(response.interval, 16);
        assert_eq!(response.repetitions, 3);
        assert_eq!(response.due_at, row.due_at);
    }

    #[test]
    fn private_deck_visible_only_to_owner() {
        let owner = Uuid::new_v4();
        let private = deck(owner, false);
        assert!(private.is_visible_to(owner));
        assert!(!private.is_visible_to(Uuid::new_v4()));

        let public = deck(owner, true);
        assert!(public.is_visible_to(Uuid::new_v4()));
        assert!(!public.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn create_deck_request_defaults() {
        let request: CreateDeckRequest =
            serde_json::from_value(serde_json::json!({ "title": "Rust" })).unwrap();
        assert_eq!(request.title, "Rust");
        assert!(request.description.is_none());
        assert!(!request.is_public);
        assert!(request.cards.is_empty());
    }
}
