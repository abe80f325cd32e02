//! Common test utilities and fixtures for integration tests.
//!
//! Integration tests require a PostgreSQL database; set DATABASE_URL.

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use uuid::Uuid;

use flashdeck_backend::config::Config;
use flashdeck_backend::db::Database;
use flashdeck_backend::services::tokens::{generate_token, hash_token};
use flashdeck_backend::{router, AppState};

/// Test context containing database connection and router.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        let config = Config::from_env().expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&config.database_url, config.max_connections)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);
        let app = router(AppState {
            db: db.clone(),
            config: Arc::new(config),
        });

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test user and return its ID and token.
    pub async fn create_test_user(&self, name: Option<&str>) -> (Uuid, String) {
        let token = generate_token();
        let user = self
            .db
            .create_user(&hash_token(&token), name)
            .await
            .expect("Failed to create test user");
        (user.id, token)
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Clean up test data for a user.
    pub async fn cleanup_user(&self, user_id: Uuid) {
        // Decks cascade to cards and their review states.
        let _ = sqlx::query("DELETE FROM card_reviews WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM decks WHERE owner = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }
}

/// Create a deck through the API and return its ID and card IDs in order.
#[allow(dead_code)]
pub async fn create_deck_via_api(
    server: &axum_test::TestServer,
    token: &str,
    title: &str,
    is_public: bool,
    num_cards: usize,
) -> (String, Vec<String>) {
    let response = server
        .post("/api/decks")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(token),
        )
        .json(&fixtures::create_deck_request(
            title,
            is_public,
            fixtures::sample_cards(num_cards),
        ))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let deck_id = response.json::<serde_json::Value>()["deck_id"]
        .as_str()
        .unwrap()
        .to_string();

    let deck = server
        .get(&format!("/api/decks/{}", deck_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(token),
        )
        .await
        .json::<serde_json::Value>();
    let card_ids = deck["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect();

    (deck_id, card_ids)
}
