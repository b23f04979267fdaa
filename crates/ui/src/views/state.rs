use dioxus::prelude::*;
use services::{
    ApiError, AuthServiceError, AuthoringError, NotesServiceError, ProgressServiceError,
    RatingServiceError,
};
use skill_core::progress::ProgressError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    NotFound,
    SignInRequired,
    Locked,
    Message(String),
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Unknown => "Something went wrong. Please try again.".to_string(),
            Self::NotFound => "We couldn't find that page.".to_string(),
            Self::SignInRequired => "Sign in to continue.".to_string(),
            Self::Locked => "Complete the previous lesson to unlock this one.".to_string(),
            Self::Message(message) => capitalize(message),
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl From<ApiError> for ViewError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized | ApiError::NotSignedIn => Self::SignInRequired,
            ApiError::Status { status: 404, .. } => Self::NotFound,
            ApiError::Status { message, .. } => Self::Message(message),
            other => {
                tracing::warn!(err = %other, "request failed");
                Self::Unknown
            }
        }
    }
}

impl From<ProgressServiceError> for ViewError {
    fn from(err: ProgressServiceError) -> Self {
        match err {
            ProgressServiceError::Progress(ProgressError::Locked { .. }) => Self::Locked,
            ProgressServiceError::Progress(ProgressError::OutOfRange { .. }) => Self::NotFound,
            ProgressServiceError::Api(err) => err.into(),
            other => Self::Message(other.to_string()),
        }
    }
}

impl From<AuthServiceError> for ViewError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::Api(err) => err.into(),
            other => Self::Message(other.to_string()),
        }
    }
}

impl From<AuthoringError> for ViewError {
    fn from(err: AuthoringError) -> Self {
        match err {
            AuthoringError::Api(err) => err.into(),
            other => Self::Message(other.to_string()),
        }
    }
}

impl From<RatingServiceError> for ViewError {
    fn from(err: RatingServiceError) -> Self {
        match err {
            RatingServiceError::Api(err) => err.into(),
            other => Self::Message(other.to_string()),
        }
    }
}

impl From<NotesServiceError> for ViewError {
    fn from(err: NotesServiceError) -> Self {
        tracing::warn!(%err, "notes storage failed");
        Self::Unknown
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(err.clone()),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
