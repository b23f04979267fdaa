mod auth;
mod class;
mod ids;
mod lesson;
mod progress;
mod rating;
mod user;

pub use auth::{AuthResponse, Credentials, OAuthProvider, Registration};
pub use class::{Class, ClassPayload, Section};
pub use ids::{ClassId, LessonId, ParseIdError, UserId};
pub use lesson::Lesson;
pub use progress::{LessonProgressRecord, ProgressUpdate};
pub use rating::{LessonRating, Rating, RatingError};
pub use user::User;
