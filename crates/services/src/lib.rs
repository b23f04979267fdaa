#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod auth_service;
pub mod authoring_service;
pub mod catalog_service;
pub mod config;
pub mod error;
pub mod notes_service;
pub mod oauth;
pub mod progress_service;
pub mod rating_service;
pub mod session;

pub use skill_core::Clock;

pub use api::{AuthApi, ClassApi, HttpApi, InMemoryAuthApi, InMemoryClassApi};
pub use app_services::AppServices;
pub use auth_service::{AuthService, SignUpOutcome};
pub use authoring_service::ClassAuthoringService;
pub use catalog_service::CatalogService;
pub use config::ClientConfig;
pub use error::{
    ApiError, AppServicesError, AuthServiceError, AuthoringError, NotesServiceError,
    ProgressServiceError, RatingServiceError, SessionError,
};
pub use notes_service::NotesService;
pub use oauth::{
    CancelSignal, OAuthCancel, OAuthFlow, OAuthOutcome, PopupError, PopupEvent, PopupHandle,
    PopupLauncher, PopupMessage, cancel_pair,
};
pub use progress_service::{
    ClassProgress, CompletionOutcome, CompletionTrigger, EnrolledClass, ProgressService,
};
pub use rating_service::RatingService;
pub use session::{Session, SessionContext};
