//! Remote API contracts and their implementations.

use async_trait::async_trait;
use skill_core::model::{
    AuthResponse, Class, ClassId, Credentials, Lesson, LessonId, LessonProgressRecord,
    LessonRating, ProgressUpdate, Rating, Registration, User,
};
use skill_core::wizard::ClassSubmission;

use crate::error::ApiError;

pub mod endpoints;
pub mod http;
pub mod memory;

pub use http::HttpApi;
pub use memory::{InMemoryAuthApi, InMemoryClassApi};

/// Class, enrollment, progress and rating endpoints.
#[async_trait]
pub trait ClassApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    async fn list_classes(&self) -> Result<Vec<Class>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    async fn get_class(&self, class_id: ClassId) -> Result<Class, ApiError>;

    /// Lessons in display order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    async fn list_lessons(&self, class_id: ClassId) -> Result<Vec<Lesson>, ApiError>;

    /// The caller's progress records for the class.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    async fn get_progress(&self, class_id: ClassId)
    -> Result<Vec<LessonProgressRecord>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    async fn update_lesson_progress(
        &self,
        class_id: ClassId,
        lesson_id: LessonId,
        update: &ProgressUpdate,
    ) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    async fn enroll(&self, class_id: ClassId) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    async fn list_enrolled(&self) -> Result<Vec<Class>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    async fn rate_lesson(
        &self,
        class_id: ClassId,
        lesson_id: LessonId,
        rating: Rating,
    ) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    async fn lesson_rating(
        &self,
        class_id: ClassId,
        lesson_id: LessonId,
    ) -> Result<LessonRating, ApiError>;

    /// `POST /api/classes` with the multipart body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    async fn create_class(&self, submission: &ClassSubmission) -> Result<Class, ApiError>;

    /// `PUT /api/classes/{id}` with the multipart body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    async fn update_class(
        &self,
        class_id: ClassId,
        submission: &ClassSubmission,
    ) -> Result<Class, ApiError>;
}

/// Account endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures, including
    /// rejected credentials.
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError>;

    /// Confirm an email address; returns the server's message.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    async fn verify_email(&self, token: &str) -> Result<String, ApiError>;

    /// Profile of the bearer of the current session token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotSignedIn` without a session, otherwise
    /// `ApiError` on transport or server failures.
    async fn current_user(&self) -> Result<User, ApiError>;
}
