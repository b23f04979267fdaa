//! Shared error types for the services crate.

use thiserror::Error;

use skill_core::model::RatingError;
use skill_core::progress::ProgressError;
use skill_core::validation::FieldError;
use skill_core::wizard::WizardError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the REST client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("your session has expired, please sign in again")]
    Unauthorized,
    #[error("sign in to continue")]
    NotSignedIn,
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("unexpected response from server: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// HTTP status of the failed response, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors emitted by `SessionContext`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error("watch at least {threshold}% of the lesson to complete it ({percent:.1}% so far)")]
    NotEligible { percent: f64, threshold: f64 },
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `AuthService` and `OAuthFlow`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthServiceError {
    #[error("please fix the highlighted fields")]
    Invalid(Vec<FieldError>),
    #[error("the server did not return a session token")]
    MissingToken,
    #[error(transparent)]
    Popup(#[from] crate::oauth::PopupError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AuthServiceError {
    /// Inline field errors, empty for every other variant.
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

/// Errors emitted by `ClassAuthoringService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthoringError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `RatingService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RatingServiceError {
    #[error(transparent)]
    Rating(#[from] RatingError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `NotesService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotesServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
