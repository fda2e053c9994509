//! Customer reviews of menu items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{PizzaId, UserId};

/// Database identifier of a review.
pub type ReviewId = i32;

/// Longest accepted review comment, in characters.
pub const COMMENT_MAX: usize = 1000;

/// Validation errors raised by review value objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i64),
    #[error("comment must be at most {max} characters")]
    CommentTooLong { max: usize },
}

/// Star rating from 1 to 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "i64", into = "i16")]
pub struct Rating(i16);

impl Rating {
    /// Validate a raw rating.
    pub fn new(value: i64) -> Result<Self, ReviewValidationError> {
        match i16::try_from(value) {
            Ok(stars @ 1..=5) => Ok(Self(stars)),
            _ => Err(ReviewValidationError::RatingOutOfRange(value)),
        }
    }

    /// Number of stars.
    pub fn value(&self) -> i16 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = ReviewValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for i16 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Optional free-text comment capped at [`COMMENT_MAX`] characters.
pub fn validate_comment(comment: Option<&str>) -> Result<(), ReviewValidationError> {
    match comment {
        Some(text) if text.chars().count() > COMMENT_MAX => {
            Err(ReviewValidationError::CommentTooLong { max: COMMENT_MAX })
        }
        _ => Ok(()),
    }
}

/// Persisted review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub pizza_id: PizzaId,
    pub user_id: UserId,
    pub rating: Rating,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated review ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub pizza_id: PizzaId,
    pub user_id: UserId,
    pub rating: Rating,
    pub comment: Option<String>,
}
