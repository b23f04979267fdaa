mod auth;
mod catalog;
mod class_details;
mod class_wizard;
mod lesson;
mod not_found;
mod state;
mod verify_email;
mod your_classes;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub(crate) use auth::FieldMessage;
pub use auth::{AuthMode, AuthModal, AuthUi, SignInPrompt, use_auth_ui_provider};
pub use catalog::CatalogView;
pub use class_details::ClassDetailsView;
pub use class_wizard::{EditClassView, NewClassView};
pub use lesson::LessonView;
pub use not_found::NotFoundView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use verify_email::VerifyEmailView;
pub use your_classes::YourClassesView;
