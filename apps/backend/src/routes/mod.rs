pub mod auth;
pub mod cards;
pub mod decks;
pub mod home;
pub mod users;
