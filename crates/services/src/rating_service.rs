use std::sync::Arc;

use skill_core::model::{ClassId, LessonId, LessonRating, Rating};

use crate::api::ClassApi;
use crate::error::RatingServiceError;

#[derive(Clone)]
pub struct RatingService {
    api: Arc<dyn ClassApi>,
}

impl RatingService {
    #[must_use]
    pub fn new(api: Arc<dyn ClassApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `RatingServiceError::Api` on transport or server failures.
    pub async fn lesson_rating(
        &self,
        class_id: ClassId,
        lesson_id: LessonId,
    ) -> Result<LessonRating, RatingServiceError> {
        Ok(self.api.lesson_rating(class_id, lesson_id).await?)
    }

    /// Rate a lesson with `1..=5` stars and return the updated aggregate.
    ///
    /// # Errors
    ///
    /// Returns `RatingServiceError::Rating` for values outside `1..=5`
    /// before any request, otherwise `RatingServiceError::Api`.
    pub async fn rate_lesson(
        &self,
        class_id: ClassId,
        lesson_id: LessonId,
        stars: u8,
    ) -> Result<LessonRating, RatingServiceError> {
        let rating = Rating::new(stars)?;
        self.api.rate_lesson(class_id, lesson_id, rating).await?;
        tracing::info!(%class_id, %lesson_id, stars, "lesson rated");
        self.lesson_rating(class_id, lesson_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryClassApi;
    use skill_core::model::{Class, Lesson, RatingError};

    fn service() -> RatingService {
        let api = InMemoryClassApi::new();
        let class: Class =
            serde_json::from_value(serde_json::json!({ "id": 1, "title": "Glassblowing" })).unwrap();
        api.insert_class(class, vec![Lesson::new(LessonId::new(5), "Gathering")]);
        RatingService::new(Arc::new(api))
    }

    #[tokio::test]
    async fn rerating_replaces_own_rating() {
        let service = service();
        let class_id = ClassId::new(1);
        let lesson_id = LessonId::new(5);

        service.rate_lesson(class_id, lesson_id, 2).await.unwrap();
        let rating = service.rate_lesson(class_id, lesson_id, 4).await.unwrap();
        assert_eq!(rating.total_ratings, 1);
        assert!((rating.average_rating - 4.0).abs() < f32::EPSILON);
        assert_eq!(rating.user_rating.map(Rating::value), Some(4));
    }

    #[tokio::test]
    async fn out_of_range_stars_are_rejected_locally() {
        let err = service()
            .rate_lesson(ClassId::new(1), LessonId::new(5), 0)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RatingServiceError::Rating(RatingError::OutOfRange(0))
        ));
    }
}
