mod modal;
mod social;

use dioxus::prelude::*;
use skill_core::model::User;
use skill_core::validation::{FieldError, FormField, message_for};

use crate::context::AppContext;

pub use modal::AuthModal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

/// Signed-in user and auth modal visibility, shared by the navbar and views.
#[derive(Clone, Copy, PartialEq)]
pub struct AuthUi {
    pub user: Signal<Option<User>>,
    pub modal: Signal<Option<AuthMode>>,
}

impl AuthUi {
    pub fn open(&mut self, mode: AuthMode) {
        self.modal.set(Some(mode));
    }

    pub fn close(&mut self) {
        self.modal.set(None);
    }

    pub fn signed_in(&mut self, user: User) {
        self.user.set(Some(user));
        self.modal.set(None);
    }

    pub fn signed_out(&mut self) {
        self.user.set(None);
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.user.read().is_some()
    }
}

/// Seed [`AuthUi`] from the restored session and provide it to descendants.
pub fn use_auth_ui_provider() -> AuthUi {
    let ctx = use_context::<AppContext>();
    let user = use_signal(|| ctx.session().current_user());
    let modal = use_signal(|| None::<AuthMode>);
    use_context_provider(|| AuthUi { user, modal })
}

#[component]
pub fn SignInPrompt(message: String) -> Element {
    let mut auth_ui = use_context::<AuthUi>();
    rsx! {
        div { class: "sign-in-prompt",
            p { "{message}" }
            button {
                class: "btn btn-primary",
                onclick: move |_| auth_ui.open(AuthMode::SignIn),
                "Sign in"
            }
        }
    }
}

#[component]
pub(crate) fn FieldMessage(errors: Vec<FieldError>, field: FormField) -> Element {
    match message_for(&errors, field) {
        Some(message) => rsx! {
            p { class: "field-error", role: "alert", "{message}" }
        },
        None => rsx! {},
    }
}
