//! Error types for flashdeck-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while turning caller input into core types.
///
/// The scheduler itself is total; only label parsing can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid difficulty: {0:?} (expected \"easy\" or \"hard\")")]
    InvalidDifficulty(String),
}
