//! PostgreSQL database operations

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

const CARD_COLUMNS: &str =
    "id, deck_id, front, back, position, extra, created_at, updated_at";
const REVIEW_COLUMNS: &str = "id, card_id, user_id, interval_days, ease_factor, repetitions, \
                              due_at, version, created_at, updated_at";

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a pool that opens connections on first use
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Repository ===

    /// Create a new user identified by the given token hash
    pub async fn create_user(&self, token_hash: &str, name: Option<&str>) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (token_hash, name)
            VALUES ($1, $2)
            RETURNING id, token_hash, name, created_at, last_seen_at
            "#,
        )
        .bind(token_hash)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by token hash
    pub async fn get_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, token_hash, name, created_at, last_seen_at
            FROM users
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, token_hash, name, created_at, last_seen_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user last_seen_at timestamp
    pub async fn update_last_seen(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Deck Repository ===

    /// Create a deck together with its cards.
    ///
    /// Runs in one transaction: either the deck and every card exist
    /// afterwards, or nothing does.
    pub async fn create_deck_with_cards(
        &self,
        owner: Uuid,
        title: &str,
        description: &str,
        is_public: bool,
        cards: &[NewCard],
    ) -> Result<Deck> {
        let mut tx = self.pool.begin().await?;

        let deck = sqlx::query_as::<_, Deck>(
            r#"
            INSERT INTO decks (owner, title, description, is_public)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner, title, description, is_public, created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(title)
        .bind(description)
        .bind(is_public)
        .fetch_one(&mut *tx)
        .await?;

        for (position, card) in cards.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| ApiError::BadRequest("too many cards".to_string()))?;
            sqlx::query(
                r#"
                INSERT INTO cards (deck_id, front, back, position)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(deck.id)
            .bind(&card.front)
            .bind(&card.back)
            .bind(position)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(deck)
    }

    /// Get deck by ID
    pub async fn get_deck(&self, deck_id: Uuid) -> Result<Option<Deck>> {
        let deck = sqlx::query_as::<_, Deck>(
            r#"
            SELECT id, owner, title, description, is_public, created_at, updated_at
            FROM decks
            WHERE id = $1
            "#,
        )
        .bind(deck_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deck)
    }

    /// Get public decks, newest first
    pub async fn list_public_decks(&self) -> Result<Vec<Deck>> {
        let decks = sqlx::query_as::<_, Deck>(
            r#"
            SELECT id, owner, title, description, is_public, created_at, updated_at
            FROM decks
            WHERE is_public
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(decks)
    }

    /// Get decks owned by a user, most recently updated first
    pub async fn list_owned_decks(&self, owner: Uuid, limit: i64) -> Result<Vec<Deck>> {
        let decks = sqlx::query_as::<_, Deck>(
            r#"
            SELECT id, owner, title, description, is_public, created_at, updated_at
            FROM decks
            WHERE owner = $1
            ORDER BY updated_at DESC
            LIMIT $2
            "#,
        )
        .bind(owner)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(decks)
    }

    /// Get decks visible to a user (public or owned), most recently updated first
    pub async fn list_recent_decks(&self, user_id: Uuid, limit: i64) -> Result<Vec<Deck>> {
        let decks = sqlx::query_as::<_, Deck>(
            r#"
            SELECT id, owner, title, description, is_public, created_at, updated_at
            FROM decks
            WHERE is_public OR owner = $1
            ORDER BY updated_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(decks)
    }

    /// Count decks owned by a user
    pub async fn count_owned_decks(&self, owner: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM decks WHERE owner = $1")
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // === Card Repository ===

    /// Get card by ID
    pub async fn get_card(&self, card_id: Uuid) -> Result<Option<Card>> {
        let card = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE id = $1"
        ))
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    /// Get all cards of a deck ordered by position
    pub async fn get_deck_cards(&self, deck_id: Uuid) -> Result<Vec<Card>> {
        let cards = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE deck_id = $1 ORDER BY position, created_at"
        ))
        .bind(deck_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    /// Append a card to a deck.
    ///
    /// The deck row is locked so concurrent appends get distinct positions.
    pub async fn add_card(&self, deck_id: Uuid, front: &str, back: &str) -> Result<Card> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM decks WHERE id = $1 FOR UPDATE")
            .bind(deck_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))?;

        let max_position: Option<i32> =
            sqlx::query_scalar("SELECT MAX(position) FROM cards WHERE deck_id = $1")
                .bind(deck_id)
                .fetch_one(&mut *tx)
                .await?;
        let position = max_position.map_or(1, |p| p.saturating_add(1));

        let card = sqlx::query_as::<_, Card>(&format!(
            r#"
            INSERT INTO cards (deck_id, front, back, position)
            VALUES ($1, $2, $3, $4)
            RETURNING {CARD_COLUMNS}
            "#
        ))
        .bind(deck_id)
        .bind(front)
        .bind(back)
        .bind(position)
        .fetch_one(&mut *tx)
        .await?;

        touch_deck(&mut tx, deck_id).await?;
        tx.commit().await?;

        Ok(card)
    }

    /// Update front and/or back of a card; absent fields keep their value
    pub async fn update_card(
        &self,
        card_id: Uuid,
        front: Option<&str>,
        back: Option<&str>,
    ) -> Result<Option<Card>> {
        let mut tx = self.pool.begin().await?;

        let card = sqlx::query_as::<_, Card>(&format!(
            r#"
            UPDATE cards
            SET front = COALESCE($2, front),
                back = COALESCE($3, back),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CARD_COLUMNS}
            "#
        ))
        .bind(card_id)
        .bind(front)
        .bind(back)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(card) = &card {
            touch_deck(&mut tx, card.deck_id).await?;
        }
        tx.commit().await?;

        Ok(card)
    }

    /// Delete a card; its review states go with it
    pub async fn delete_card(&self, card_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(card_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get cards of a deck that are due for a user, earliest first
    pub async fn get_due_cards(
        &self,
        deck_id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Card>> {
        let cards = sqlx::query_as::<_, Card>(
            r#"
            SELECT c.id, c.deck_id, c.front, c.back, c.position, c.extra,
                   c.created_at, c.updated_at
            FROM card_reviews r
            JOIN cards c ON c.id = r.card_id
            WHERE c.deck_id = $1 AND r.user_id = $2 AND r.due_at <= $3
            ORDER BY r.due_at, c.position
            "#,
        )
        .bind(deck_id)
        .bind(user_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    // === Review Repository ===

    /// Get the review state of a card for a user
    pub async fn get_card_review(&self, card_id: Uuid, user_id: Uuid) -> Result<Option<DbCardReview>> {
        let review = sqlx::query_as::<_, DbCardReview>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM card_reviews WHERE card_id = $1 AND user_id = $2"
        ))
        .bind(card_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    /// Insert the first review state for (card, user).
    ///
    /// Returns `None` if a row already exists, meaning another submission
    /// got there first.
    pub async fn insert_card_review(
        &self,
        card_id: Uuid,
        user_id: Uuid,
        next: &ScheduledReview,
    ) -> Result<Option<DbCardReview>> {
        let review = sqlx::query_as::<_, DbCardReview>(&format!(
            r#"
            INSERT INTO card_reviews (card_id, user_id, interval_days, ease_factor, repetitions, due_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (card_id, user_id) DO NOTHING
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(card_id)
        .bind(user_id)
        .bind(i64::from(next.state.interval))
        .bind(next.state.ease_factor)
        .bind(i64::from(next.state.repetitions))
        .bind(next.due_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(missing_card_as_not_found)?;

        Ok(review)
    }

    /// Overwrite the review state if it is still at `expected_version`.
    ///
    /// Returns `None` when the version moved on, meaning the caller computed
    /// from a stale state.
    pub async fn update_card_review(
        &self,
        card_id: Uuid,
        user_id: Uuid,
        expected_version: i64,
        next: &ScheduledReview,
    ) -> Result<Option<DbCardReview>> {
        let review = sqlx::query_as::<_, DbCardReview>(&format!(
            r#"
            UPDATE card_reviews
            SET interval_days = $4,
                ease_factor = $5,
                repetitions = $6,
                due_at = $7,
                version = version + 1,
                updated_at = NOW()
            WHERE card_id = $1 AND user_id = $2 AND version = $3
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(card_id)
        .bind(user_id)
        .bind(expected_version)
        .bind(i64::from(next.state.interval))
        .bind(next.state.ease_factor)
        .bind(i64::from(next.state.repetitions))
        .bind(next.due_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    /// Get review states due for a user across all decks, earliest first
    pub async fn get_due_reviews(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<DueReview>> {
        let reviews = sqlx::query_as::<_, DueReview>(
            r#"
            SELECT r.card_id, r.interval_days, r.ease_factor, r.repetitions, r.due_at,
                   c.front, c.back, d.id AS deck_id, d.title AS deck_title
            FROM card_reviews r
            JOIN cards c ON c.id = r.card_id
            JOIN decks d ON d.id = c.deck_id
            WHERE r.user_id = $1 AND r.due_at <= $2
            ORDER BY r.due_at
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Count cards a user has a review state for
    pub async fn count_reviewed_cards(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM card_reviews WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

async fn touch_deck(tx: &mut sqlx::Transaction<'_, sqlx::Postgres>, deck_id: Uuid) -> Result<()> {
    sqlx::query("UPDATE decks SET updated_at = NOW() WHERE id = $1")
        .bind(deck_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

// The card can vanish between the existence check and the insert.
fn missing_card_as_not_found(err: sqlx::Error) -> ApiError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            ApiError::NotFound("Card not found".to_string())
        }
        _ => ApiError::Database(err),
    }
}
