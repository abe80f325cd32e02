//! Test fixtures and factory functions for creating test data.

#![allow(dead_code)]

use serde_json::json;

/// Generate `count` numbered cards.
pub fn sample_cards(count: usize) -> Vec<serde_json::Value> {
    (0..count)
        .map(|i| {
            json!({
                "front": format!("Question {}?", i + 1),
                "back": format!("Answer {}.", i + 1),
            })
        })
        .collect()
}

/// Create a register request body.
pub fn register_request(name: Option<&str>) -> serde_json::Value {
    match name {
        Some(n) => json!({ "name": n }),
        None => json!({}),
    }
}

/// Create a deck creation request body.
pub fn create_deck_request(title: &str, is_public: bool, cards: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "title": title,
        "description": format!("{} deck", title),
        "is_public": is_public,
        "cards": cards,
    })
}

/// Create a card creation request body.
pub fn create_card_request(front: &str, back: &str) -> serde_json::Value {
    json!({ "front": front, "back": back })
}

/// Create a review submission body.
pub fn review_request(difficulty: &str) -> serde_json::Value {
    json!({ "difficulty": difficulty })
}
