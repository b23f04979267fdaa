use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RatingError {
    #[error("rating must be between 1 and 5, got {0}")]
    OutOfRange(u8),
}

/// A star rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// # Errors
    ///
    /// Returns `RatingError::OutOfRange` outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, RatingError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError::OutOfRange(value))
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// Aggregate rating of a lesson plus the caller's own rating, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRating {
    #[serde(default)]
    pub average_rating: f32,
    #[serde(default)]
    pub total_ratings: u32,
    #[serde(default)]
    pub user_rating: Option<Rating>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_rejects_zero_and_six() {
        assert_eq!(Rating::new(0), Err(RatingError::OutOfRange(0)));
        assert_eq!(Rating::new(6), Err(RatingError::OutOfRange(6)));
        assert_eq!(Rating::new(5).map(Rating::value), Ok(5));
    }

    #[test]
    fn lesson_rating_rejects_invalid_user_rating() {
        let parsed = serde_json::from_str::<LessonRating>(r#"{"userRating": 9}"#);
        assert!(parsed.is_err());
    }
}
